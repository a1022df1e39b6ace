//! `chrome.storage.local` as a [`StorageArea`].

use cityweather_store::{StorageArea, StorageError};
use serde_json::{Map, Value};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::chrome;

fn backend(error: JsValue) -> StorageError {
    StorageError::backend(chrome::js_error(&error))
}

/// The extension's local storage area, shared by every page and the worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl StorageArea for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let keys = JsValue::from_str(key);
        let promise = chrome::storage_local_get(&keys).map_err(backend)?;
        let items = JsFuture::from(promise).await.map_err(backend)?;

        let value = js_sys::Reflect::get(&items, &keys).map_err(backend)?;
        if value.is_undefined() {
            return Ok(None);
        }
        chrome::from_js(&value)
            .map(Some)
            .map_err(StorageError::Corrupt)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut items = Map::new();
        items.insert(key.to_string(), value);
        let items = chrome::to_js(&items).map_err(StorageError::backend)?;

        let promise = chrome::storage_local_set(&items).map_err(backend)?;
        JsFuture::from(promise).await.map_err(backend)?;
        Ok(())
    }
}
