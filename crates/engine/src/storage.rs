//! Durable key/value storage used by the ledger and the identity holder.
//!
//! Every value is replaced whole on write. Adapters:
//!
//! - [`MemoryStorage`] keeps values in a map, for tests and throwaway sessions.
//! - [`FileStorage`] writes one `<key>.json` file per key in a directory.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use thiserror::Error;

pub use file::FileStorage;

mod file;

/// Key of the serialized transaction collection.
pub const TRANSACTIONS_KEY: &str = "khata_transactions";
/// Key of the serialized signed-in identity.
pub const IDENTITY_KEY: &str = "khata_user";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Storage port. Implementations must be usable from several threads.
pub trait Storage: Send + Sync {
    /// Reads the value under `key`, `None` when nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values().remove(key);
        Ok(())
    }
}
