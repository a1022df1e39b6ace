//! In-memory storage area.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

use crate::backend::{StorageArea, StorageError};

/// Map-backed storage area with an optional byte quota.
///
/// Usage is measured the way `chrome.storage.local` does it: key length plus
/// the length of the value's JSON serialization.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, Value>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once usage would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

}

fn entry_size(key: &str, value: &Value) -> usize {
    key.len() + value.to_string().len()
}

impl StorageArea for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut items = self.items.lock();

        if let Some(quota) = self.quota_bytes {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let needed = others + entry_size(key, &value);
            if needed > quota {
                tracing::warn!("Rejecting write to '{}': {} > {} bytes", key, needed, quota);
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        items.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_key() {
        let storage = MemoryStorage::new();
        assert!(storage.get("cities").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let storage = MemoryStorage::new();
        storage.set("cities", json!(["Paris"])).await.unwrap();
        storage.set("cities", json!(["Tokyo"])).await.unwrap();
        assert_eq!(storage.get("cities").await.unwrap(), Some(json!(["Tokyo"])));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let storage = MemoryStorage::new();
        storage.set("cities", json!(["Paris"])).await.unwrap();
        storage.set("options", json!({"homeCity": "Lima"})).await.unwrap();
        assert_eq!(storage.get("cities").await.unwrap(), Some(json!(["Paris"])));
        assert_eq!(
            storage.get("options").await.unwrap(),
            Some(json!({"homeCity": "Lima"}))
        );
    }

    #[tokio::test]
    async fn test_quota_rejects_oversized_write() {
        // "cities" (6) + "[]" (2) = 8 bytes
        let storage = MemoryStorage::with_quota(8);
        storage.set("cities", json!([])).await.unwrap();

        let err = storage.set("cities", json!(["Paris"])).await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 8, .. }));

        // Rejected write leaves the old value in place
        assert_eq!(storage.get("cities").await.unwrap(), Some(json!([])));
    }

    #[tokio::test]
    async fn test_quota_counts_replacement_not_sum() {
        let storage = MemoryStorage::with_quota(16);
        storage.set("k", json!("aaaaaaaaaa")).await.unwrap();
        // "k" (1) + 12 bytes of JSON = 13: replacing must not count the old value
        storage.set("k", json!("bbbbbbbbbb")).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some(json!("bbbbbbbbbb")));

        let err = storage.set("k", json!("cccccccccccccccc")).await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 19, quota: 16 }));
    }
}
