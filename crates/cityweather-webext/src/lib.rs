//! Browser glue for the city weather extension.
//!
//! Binds the controllers in `cityweather-extension` to the `chrome.*`
//! APIs and the DOM. Everything but [`API_KEY`] is `wasm32`-only, so the
//! workspace still builds natively.
//!
//! Entry points, called from the JS loaders in `extension/`:
//! - `handleInstalled` and `handleMenuClick` for the service worker
//! - [`popup_main`] for `popup.html`
//! - [`options_main`] for `options.html`
//!
//! Instantiating the module installs the panic hook and console logging.

// wasm-bindgen expands imports and exports into unsafe shims.
#![allow(unsafe_code)]

#[cfg(target_arch = "wasm32")]
mod background;
#[cfg(target_arch = "wasm32")]
mod chrome;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod error;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod menus;
#[cfg(target_arch = "wasm32")]
mod options;
#[cfg(target_arch = "wasm32")]
mod popup;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod tabs;

#[cfg(target_arch = "wasm32")]
pub use background::{handle_installed, handle_menu_click};
#[cfg(target_arch = "wasm32")]
pub use error::GlueError;
#[cfg(target_arch = "wasm32")]
pub use menus::ChromeMenus;
#[cfg(target_arch = "wasm32")]
pub use options::options_main;
#[cfg(target_arch = "wasm32")]
pub use popup::popup_main;
#[cfg(target_arch = "wasm32")]
pub use storage::ChromeStorage;
#[cfg(target_arch = "wasm32")]
pub use tabs::ChromeTabs;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn on_load() {
    console_error_panic_hook::set_once();
    logging::init();
}

/// OpenWeather key baked in at build time (`OPENWEATHER_API_KEY=... wasm-pack build`).
pub const API_KEY: &str = match option_env!("OPENWEATHER_API_KEY") {
    Some(key) => key,
    None => "",
};
