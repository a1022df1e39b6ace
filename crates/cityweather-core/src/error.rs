//! Top-level error type for hosts.
//!
//! Each crate keeps its own error enum; `AppError` gathers them so a host
//! can log the full error and show `user_message()` to the user.

use cityweather_extension::{BootstrapError, MessagingError, PopupError};
use cityweather_store::{StorageError, StoreError};
use cityweather_weather::WeatherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Popup error: {0}")]
    Popup(#[from] PopupError),

    #[error("Install error: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Store(StoreError::Backend(e))
    }
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Store(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Popup(e) => e.user_message(),
            AppError::Bootstrap(BootstrapError::Store(e)) => e.user_message(),
            AppError::Bootstrap(BootstrapError::Menu(_)) => {
                "Could not add the context menu entry. Try reloading the extension."
            }
            AppError::Messaging(_) => "Could not reach the current page.",
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not read config file {0}")]
    Read(String),

    #[error("Configuration parse error in {0}")]
    ParseError(String),

    #[error("Could not write config file {0}")]
    Write(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::Read(_) | ConfigError::Write(_) => {
                "Could not access the configuration file. Check its permissions."
            }
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}
