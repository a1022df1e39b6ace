//! Typed access to the `cities` and `options` slots.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::backend::{StorageArea, StorageError};
use crate::types::Options;

pub const CITIES_KEY: &str = "cities";
pub const OPTIONS_KEY: &str = "options";

/// Errors from the typed store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(#[from] StorageError),

    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },

    #[error("Failed to decode '{key}': {source}")]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Backend(e) => e.user_message(),
            Self::Encode { .. } => "Unable to save your changes. Please try again.",
            Self::Decode { .. } => "Saved data may be corrupted. Consider reinstalling.",
        }
    }
}

/// The extension's two slots over any storage area.
///
/// Each setter overwrites its slot wholesale. Nothing ties the slots
/// together: concurrent writers to different slots interleave freely, and
/// concurrent read-modify-write of the same slot can lose an update.
#[derive(Debug, Clone)]
pub struct Store<A> {
    area: A,
}

impl<A: StorageArea> Store<A> {
    pub fn new(area: A) -> Self {
        Self { area }
    }

    pub async fn set_cities(&self, cities: &[String]) -> Result<(), StoreError> {
        self.write(CITIES_KEY, cities).await
    }

    /// Returns `None` if the slot was never written.
    pub async fn get_cities(&self) -> Result<Option<Vec<String>>, StoreError> {
        self.read(CITIES_KEY).await
    }

    pub async fn set_options(&self, options: &Options) -> Result<(), StoreError> {
        self.write(OPTIONS_KEY, options).await
    }

    /// Returns `None` if the slot was never written.
    pub async fn get_options(&self) -> Result<Option<Options>, StoreError> {
        self.read(OPTIONS_KEY).await
    }

    async fn write<T: Serialize + ?Sized>(
        &self,
        key: &'static str,
        value: &T,
    ) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(value).map_err(|source| StoreError::Encode { key, source })?;
        self.area.set(key, value).await?;
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StoreError> {
        match self.area.get(key).await? {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Decode { key, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use cityweather_weather::TempScale;
    use serde_json::json;

    fn cities(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unset_slots_read_as_none() {
        let store = Store::new(MemoryStorage::new());
        assert!(store.get_cities().await.unwrap().is_none());
        assert!(store.get_options().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cities_round_trip_preserves_order_and_duplicates() {
        let store = Store::new(MemoryStorage::new());
        let list = cities(&["Paris", "Tokyo", "Paris"]);
        store.set_cities(&list).await.unwrap();
        assert_eq!(store.get_cities().await.unwrap(), Some(list));
    }

    #[tokio::test]
    async fn test_get_options_after_set_returns_same_record() {
        let store = Store::new(MemoryStorage::new());
        let options = Options {
            has_auto_overlay: true,
            home_city: "Nairobi".to_string(),
            temp_scale: TempScale::Metric,
        };
        store.set_options(&options).await.unwrap();
        assert_eq!(store.get_options().await.unwrap(), Some(options));
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let store = Store::new(MemoryStorage::new());
        store.set_cities(&cities(&["Lima"])).await.unwrap();
        store.set_options(&Options::default()).await.unwrap();
        store.set_cities(&[]).await.unwrap();

        assert_eq!(store.get_cities().await.unwrap(), Some(vec![]));
        assert_eq!(store.get_options().await.unwrap(), Some(Options::default()));
    }

    #[tokio::test]
    async fn test_slot_keys_and_shape() {
        let store = Store::new(MemoryStorage::new());
        store.set_cities(&cities(&["Paris"])).await.unwrap();
        store.set_options(&Options::default()).await.unwrap();

        assert_eq!(
            store.area.get(CITIES_KEY).await.unwrap(),
            Some(json!(["Paris"]))
        );
        assert_eq!(
            store.area.get(OPTIONS_KEY).await.unwrap(),
            Some(json!({"hasAutoOverlay": false, "homeCity": "", "tempScale": "imperial"}))
        );
    }

    #[tokio::test]
    async fn test_wrong_shape_is_decode_error() {
        let area = MemoryStorage::new();
        area.set(CITIES_KEY, json!("Paris")).await.unwrap();
        let store = Store::new(area);

        let err = store.get_cities().await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { key: "cities", .. }));
    }

    #[tokio::test]
    async fn test_quota_exceeded_surfaces_as_store_error() {
        let store = Store::new(MemoryStorage::with_quota(10));
        let err = store
            .set_cities(&cities(&["Llanfairpwllgwyngyll"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Backend(StorageError::QuotaExceeded { .. })
        ));
        assert!(err.user_message().contains("full"));
    }

    #[tokio::test]
    async fn test_shared_area_through_reference() {
        let area = MemoryStorage::new();
        let writer = Store::new(&area);
        let reader = Store::new(&area);
        writer.set_cities(&cities(&["Cairo"])).await.unwrap();
        assert_eq!(reader.get_cities().await.unwrap(), Some(cities(&["Cairo"])));
    }
}
