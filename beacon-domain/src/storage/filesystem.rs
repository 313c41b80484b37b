//! Key/value storage backed by one file per key inside a directory.

use async_trait::async_trait;
use beacon_core::utils::fs;
use beacon_core::CoreError;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::ports::KeyValueStoreAsync;

pub struct FilesystemKeyValueStore {
    root_dir: PathBuf,
}

impl FilesystemKeyValueStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn path_for_key(&self, key: &str) -> Result<PathBuf, CoreError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(CoreError::InvalidInput(format!(
                "Storage key '{}' cannot be mapped to a file name",
                key
            )));
        }
        Ok(self.root_dir.join(key))
    }
}

#[async_trait]
impl KeyValueStoreAsync for FilesystemKeyValueStore {
    async fn read_value(&self, key: &str) -> Result<String, CoreError> {
        let path = self.path_for_key(key)?;
        debug!("Reading value for key '{}' from {:?}", key, path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CoreError::Filesystem {
                message: format!("Failed to read value for key '{}'", key),
                path,
                source: e,
            })
    }

    async fn write_value(&self, key: &str, value: String) -> Result<(), CoreError> {
        let path = self.path_for_key(key)?;
        let root_dir = self.root_dir.clone();
        let target = path.clone();
        let len = value.len();
        tokio::task::spawn_blocking(move || {
            fs::ensure_dir_exists(&root_dir)?;
            // Readers see either the old file or the complete new one.
            fs::write_string_atomically(&target, &value)
        })
        .await
        .map_err(|e| {
            error!("Storage write task for key '{}' did not complete: {}", key, e);
            CoreError::Internal(format!("Storage write task failed: {}", e))
        })??;
        debug!("Wrote {} bytes for key '{}' to {:?}", len, key, path);
        Ok(())
    }
}
