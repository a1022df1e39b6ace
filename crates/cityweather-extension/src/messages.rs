//! Messages sent to the content script of the active tab.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One-way notifications. No payload, no reply.
///
/// Serialized as the bare strings `"TOGGLE_SCALE"` and `"TOGGLE_OVERLAY"`,
/// which is what the content script listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    ToggleScale,
    ToggleOverlay,
}

impl Message {
    pub const ALL: [Message; 2] = [Message::ToggleScale, Message::ToggleOverlay];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleScale => "TOGGLE_SCALE",
            Self::ToggleOverlay => "TOGGLE_OVERLAY",
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Message {
    type Err = MessagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| MessagingError::UnknownMessage(s.to_string()))
    }
}

/// Errors from tab messaging and context-menu registration.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// No content script is listening in the target tab.
    #[error("No receiver in tab {0}")]
    NoReceiver(i32),

    #[error("Unknown message: {0}")]
    UnknownMessage(String),

    /// Error reported by the browser API.
    #[error("Browser API error: {0}")]
    Browser(String),
}

impl MessagingError {
    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser(message.into())
    }
}
