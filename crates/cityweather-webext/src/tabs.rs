use cityweather_extension::{Message, MessagingError, TabId, TabMessenger};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::chrome;

/// Chrome's rejection text when no content script is listening.
const NO_RECEIVER: &str = "Receiving end does not exist";

#[derive(Debug, Deserialize)]
struct Tab {
    #[serde(default)]
    id: Option<i32>,
}

fn browser(error: JsValue) -> MessagingError {
    MessagingError::browser(chrome::js_error(&error))
}

/// `chrome.tabs` messenger.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl TabMessenger for ChromeTabs {
    async fn active_tab(&self) -> Result<Option<TabId>, MessagingError> {
        let query = chrome::to_js(&serde_json::json!({ "active": true }))
            .map_err(MessagingError::browser)?;
        let promise = chrome::tabs_query(&query).map_err(browser)?;
        let tabs = JsFuture::from(promise).await.map_err(browser)?;

        let tabs: Vec<Tab> = chrome::from_js(&tabs).map_err(MessagingError::browser)?;
        Ok(tabs.first().and_then(|tab| tab.id).map(TabId))
    }

    async fn send_message(&self, tab: TabId, message: Message) -> Result<(), MessagingError> {
        let payload = JsValue::from_str(message.as_str());
        let promise = chrome::tabs_send_message(tab.0, &payload).map_err(browser)?;

        match JsFuture::from(promise).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let text = chrome::js_error(&e);
                if text.contains(NO_RECEIVER) {
                    Err(MessagingError::NoReceiver(tab.0))
                } else {
                    Err(MessagingError::Browser(text))
                }
            }
        }
    }
}
