//! Delivery of messages to the active tab.

use serde::{Deserialize, Serialize};

use crate::messages::{Message, MessagingError};

/// Browser tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub i32);

#[allow(async_fn_in_trait)]
pub trait TabMessenger {
    /// The currently active tab, if any.
    async fn active_tab(&self) -> Result<Option<TabId>, MessagingError>;

    async fn send_message(&self, tab: TabId, message: Message) -> Result<(), MessagingError>;
}

/// Outcome of a fire-and-forget notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent(TabId),
    NoActiveTab,
    /// The query or send failed; the error was logged and dropped.
    Failed,
}

/// Send `message` to the active tab's content script without waiting for a
/// reply. Failures are logged and swallowed.
pub async fn notify_active_tab<T: TabMessenger + ?Sized>(tabs: &T, message: Message) -> Delivery {
    let tab = match tabs.active_tab().await {
        Ok(Some(tab)) => tab,
        Ok(None) => {
            tracing::debug!("No active tab for {}", message);
            return Delivery::NoActiveTab;
        }
        Err(e) => {
            tracing::debug!("Active tab query failed for {}: {}", message, e);
            return Delivery::Failed;
        }
    };

    match tabs.send_message(tab, message).await {
        Ok(()) => {
            tracing::debug!("Sent {} to tab {}", message, tab.0);
            Delivery::Sent(tab)
        }
        Err(e) => {
            tracing::debug!("Could not deliver {} to tab {}: {}", message, tab.0, e);
            Delivery::Failed
        }
    }
}

/// Messenger for hosts without browser tabs (the native CLI).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBrowserTabs;

impl TabMessenger for NoBrowserTabs {
    async fn active_tab(&self) -> Result<Option<TabId>, MessagingError> {
        Ok(None)
    }

    async fn send_message(&self, tab: TabId, message: Message) -> Result<(), MessagingError> {
        tracing::info!("Would send {} to tab {}", message, tab.0);
        Ok(())
    }
}
