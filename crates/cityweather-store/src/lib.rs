//! Persistent storage for the city weather extension.
//!
//! Two independent slots, `cities` and `options`, live in a shared JSON
//! key-value namespace. The namespace is a [`StorageArea`]; in the browser
//! that is `chrome.storage.local`, natively a JSON file, in tests a map.

pub mod backend;
#[cfg(feature = "fs")]
pub mod file;
pub mod memory;
pub mod store;
pub mod types;

pub use backend::{StorageArea, StorageError};
#[cfg(feature = "fs")]
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use store::{Store, StoreError, CITIES_KEY, OPTIONS_KEY};
pub use types::Options;
