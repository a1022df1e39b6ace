//! Extension behaviour, independent of the browser.
//!
//! The background worker, popup, options page and weather cards are written
//! against small traits (`StorageArea`, `TabMessenger`, `ContextMenus`,
//! `WeatherSource`) so the same code runs in the wasm build, the native CLI
//! host and tests.

pub mod background;
pub mod card;
pub mod menus;
pub mod messages;
pub mod options_page;
pub mod popup;
pub mod tabs;

pub use background::{on_context_menu_clicked, on_installed, BootstrapError};
pub use card::{CardKey, CardList, CardSpec, CardState, CardView, FetchTicket, WeatherCard};
pub use menus::{ContextMenus, LoggingMenus, MenuClick, MenuContext, MenuItem};
pub use messages::{Message, MessagingError};
pub use options_page::{FormState, OptionsPage, SAVE_COOLDOWN};
pub use popup::{Popup, PopupError};
pub use tabs::{notify_active_tab, Delivery, NoBrowserTabs, TabId, TabMessenger};
