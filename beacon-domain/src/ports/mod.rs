// Traits (ports) the domain logic expects outer layers to implement.

pub mod key_value_store;
pub use key_value_store::KeyValueStoreAsync;
