use async_trait::async_trait;
use beacon_core::CoreError;

/// Durable string storage addressed by key.
///
/// The domain layer expects outer layers to implement this; a filesystem and an
/// in-memory implementation live in [`crate::storage`].
#[async_trait]
pub trait KeyValueStoreAsync: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// A key that was never written yields an error for which
    /// [`CoreError::is_not_found_error`] returns `true`.
    async fn read_value(&self, key: &str) -> Result<String, CoreError>;

    /// Replaces the value stored under `key`. A reader never observes a partial write.
    async fn write_value(&self, key: &str, value: String) -> Result<(), CoreError>;
}
