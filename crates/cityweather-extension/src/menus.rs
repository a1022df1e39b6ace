//! Context-menu registration.

use serde::{Deserialize, Serialize};

use crate::messages::MessagingError;

pub const ADD_CITY_MENU_ID: &str = "weatherExtension";
pub const ADD_CITY_MENU_TITLE: &str = "Add city to weather extension";

/// Where a menu entry is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    Selection,
}

/// `chrome.contextMenus.create` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

impl MenuItem {
    /// The single "add selected text as a city" entry.
    pub fn add_city() -> Self {
        Self {
            id: ADD_CITY_MENU_ID.to_string(),
            title: ADD_CITY_MENU_TITLE.to_string(),
            contexts: vec![MenuContext::Selection],
        }
    }
}

/// The subset of `chrome.contextMenus.OnClickData` the handler reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    pub menu_item_id: String,
    #[serde(default)]
    pub selection_text: Option<String>,
}

impl MenuClick {
    pub fn selection(text: impl Into<String>) -> Self {
        Self {
            menu_item_id: ADD_CITY_MENU_ID.to_string(),
            selection_text: Some(text.into()),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait ContextMenus {
    async fn create(&self, item: &MenuItem) -> Result<(), MessagingError>;
}

/// Menu registrar for hosts without a browser; records the entry in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMenus;

impl ContextMenus for LoggingMenus {
    async fn create(&self, item: &MenuItem) -> Result<(), MessagingError> {
        tracing::info!("Registered context menu '{}' ({})", item.title, item.id);
        Ok(())
    }
}
