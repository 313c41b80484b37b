use async_trait::async_trait;
use beacon_core::CoreError;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::ports::KeyValueStoreAsync;

/// Process-local key/value storage.
///
/// Writes can be made to fail with [`InMemoryKeyValueStore::set_fail_writes`],
/// which is how callers exercise their persistence-failure paths.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(key.into(), value.into());
        }
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current value under `key`, bypassing the async port.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok().and_then(|values| values.get(key).cloned())
    }
}

#[async_trait]
impl KeyValueStoreAsync for InMemoryKeyValueStore {
    async fn read_value(&self, key: &str) -> Result<String, CoreError> {
        let values = self
            .values
            .read()
            .map_err(|e| {
                CoreError::Internal(format!("Failed to acquire read lock for values: {}", e))
            })?;
        values.get(key).cloned().ok_or_else(|| {
            CoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no value stored under key '{}'", key),
            ))
        })
    }

    async fn write_value(&self, key: &str, value: String) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        let mut values = self
            .values
            .write()
            .map_err(|e| {
                CoreError::Internal(format!("Failed to acquire write lock for values: {}", e))
            })?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}
