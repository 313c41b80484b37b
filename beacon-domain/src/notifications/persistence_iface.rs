use async_trait::async_trait;

use super::errors::PersistenceError;
use super::seen_set::SeenSet;

/// Durable home of the seen-set.
#[async_trait]
pub trait SeenSetStore: Send + Sync {
    /// Returns the stored seen-set. Never fails: missing, unreadable or
    /// malformed data yields an empty set.
    async fn load(&self) -> SeenSet;

    /// Overwrites the stored seen-set. Last writer wins.
    async fn save(&self, ids: &SeenSet) -> Result<(), PersistenceError>;
}
