//! Implementations of [`KeyValueStoreAsync`](crate::ports::KeyValueStoreAsync).

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemKeyValueStore;
pub use memory::InMemoryKeyValueStore;
