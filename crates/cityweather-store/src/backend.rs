//! Storage area trait and error types.
//!
//! `StorageArea` abstracts over the key-value backends (browser storage,
//! JSON file, in-memory map). Values are JSON; keys are plain strings.

use serde_json::Value;
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would take the area over its byte quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Error reported by the host (e.g. `chrome.runtime.lastError`).
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data is not a JSON object.
    #[error("Storage data is corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => "Storage is full. Remove some cities and try again.",
            Self::Backend(_) | Self::Io(_) => "Unable to access saved data. Please try again.",
            Self::Corrupt(_) => "Saved data may be corrupted. Consider reinstalling.",
        }
    }
}

/// A shared JSON key-value namespace.
///
/// Operations are single-shot. There is no subscription and no transaction
/// spanning more than one key.
#[allow(async_fn_in_trait)]
pub trait StorageArea {
    /// Read one key. Returns `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Overwrite one key.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

impl<T: StorageArea + ?Sized> StorageArea for &T {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }
}

impl<T: StorageArea + ?Sized> StorageArea for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }
}

impl<T: StorageArea + ?Sized> StorageArea for Rc<T> {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }
}
