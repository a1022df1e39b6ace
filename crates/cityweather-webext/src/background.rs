//! Service worker handlers.
//!
//! `background.js` registers the `runtime.onInstalled` and
//! `contextMenus.onClicked` listeners synchronously on the worker's first
//! turn, as MV3 requires, and forwards each event here once the module has
//! been instantiated.

use cityweather_extension::{on_context_menu_clicked, on_installed, MenuClick};
use cityweather_store::Store;
use wasm_bindgen::prelude::*;

use crate::chrome;
use crate::menus::ChromeMenus;
use crate::storage::ChromeStorage;

/// `runtime.onInstalled`: reset storage and register the context menu.
#[wasm_bindgen(js_name = handleInstalled)]
pub async fn handle_installed() {
    let store = Store::new(ChromeStorage);
    if let Err(e) = on_installed(&store, &ChromeMenus).await {
        tracing::warn!("Install handler failed: {}", e);
    }
}

/// `contextMenus.onClicked`: `info` is the `OnClickData` object.
#[wasm_bindgen(js_name = handleMenuClick)]
pub async fn handle_menu_click(info: JsValue) {
    let click: MenuClick = match chrome::from_js(&info) {
        Ok(click) => click,
        Err(e) => {
            tracing::warn!("Unreadable context menu click: {}", e);
            return;
        }
    };

    let store = Store::new(ChromeStorage);
    match on_context_menu_clicked(&store, &click).await {
        Ok(Some(city)) => tracing::info!("Added '{}' from the context menu", city),
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not add city from context menu: {}", e),
    }
}
