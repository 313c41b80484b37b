//! # Beacon Domain Library (`beacon-domain`)
//!
//! The notification reconciliation engine and the storage it persists through.
//!
//! - [`notifications`]: data model, reconciler, scheduler and the transport and
//!   presenter traits a host implements.
//! - [`ports`]: traits outer layers implement, currently [`ports::KeyValueStoreAsync`].
//! - [`storage`]: filesystem and in-memory key/value stores.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use beacon_domain::notifications::{
//!     KeyValueSeenSetStore, Reconciler, ReconcilerOptions, Scheduler, SchedulerMode,
//! };
//! use beacon_domain::storage::FilesystemKeyValueStore;
//!
//! let kv = Arc::new(FilesystemKeyValueStore::new(data_dir));
//! let store = Arc::new(KeyValueSeenSetStore::new(kv, "swan-notifications"));
//! let options = ReconcilerOptions::default();
//! let reconciler = Arc::new(Reconciler::new(transport, presenter, store, options).await);
//! let scheduler = Scheduler::spawn(reconciler, SchedulerMode::Interval(Duration::from_secs(60)));
//! ```

pub mod error;
pub mod notifications;
pub mod ports;
pub mod storage;

pub use error::{DomainError, DomainResult};
