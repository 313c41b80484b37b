use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::errors::PersistenceError;
use super::persistence_iface::SeenSetStore;
use super::seen_set::SeenSet;
use crate::ports::KeyValueStoreAsync;

/// [`SeenSetStore`] that keeps the comma-joined id list under one key of a
/// [`KeyValueStoreAsync`].
pub struct KeyValueSeenSetStore {
    pub store: Arc<dyn KeyValueStoreAsync>,
    pub seen_set_key: String,
}

impl KeyValueSeenSetStore {
    pub fn new(store: Arc<dyn KeyValueStoreAsync>, seen_set_key: impl Into<String>) -> Self {
        Self {
            store,
            seen_set_key: seen_set_key.into(),
        }
    }
}

#[async_trait]
impl SeenSetStore for KeyValueSeenSetStore {
    async fn load(&self) -> SeenSet {
        debug!("Loading seen-set from key '{}'", self.seen_set_key);
        let raw = match self.store.read_value(&self.seen_set_key).await {
            Ok(raw) => raw,
            Err(core_error) if core_error.is_not_found_error() => {
                info!(
                    "No seen-set stored under key '{}'. Starting with an empty set.",
                    self.seen_set_key
                );
                return SeenSet::new();
            }
            Err(core_error) => {
                warn!(
                    "Failed to read seen-set from key '{}': {}. Starting with an empty set.",
                    self.seen_set_key, core_error
                );
                return SeenSet::new();
            }
        };

        match SeenSet::parse_storage(&raw) {
            Ok(seen) => {
                debug!("Loaded {} seen ids from key '{}'", seen.len(), self.seen_set_key);
                seen
            }
            Err(e) => {
                warn!(
                    "Stored seen-set under key '{}' is malformed ({}). Starting with an empty set.",
                    self.seen_set_key, e
                );
                SeenSet::new()
            }
        }
    }

    async fn save(&self, ids: &SeenSet) -> Result<(), PersistenceError> {
        debug!("Saving {} seen ids to key '{}'", ids.len(), self.seen_set_key);
        self.store
            .write_value(&self.seen_set_key, ids.to_storage_string())
            .await
            .map_err(|core_error| {
                PersistenceError::from_core("save_seen_set", "Failed to write seen-set", core_error)
            })
    }
}
