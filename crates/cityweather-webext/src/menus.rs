use cityweather_extension::{ContextMenus, MenuItem, MessagingError};

use crate::chrome;

/// `chrome.contextMenus` registrar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeMenus;

impl ContextMenus for ChromeMenus {
    async fn create(&self, item: &MenuItem) -> Result<(), MessagingError> {
        let properties = chrome::to_js(item).map_err(MessagingError::browser)?;
        chrome::context_menus_create(&properties)
            .map_err(|e| MessagingError::browser(chrome::js_error(&e)))?;
        tracing::debug!("Registered context menu '{}'", item.id);
        Ok(())
    }
}
