//! Configuration Management for Beacon Core.
//!
//! - [`types`]: the configuration schema ([`CoreConfig`], [`LoggingConfig`],
//!   [`NotificationSyncConfig`]).
//! - [`defaults`]: default values used by `serde` for missing fields.
//! - [`loader`]: [`ConfigLoader`], which finds, parses and validates `config.toml`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use beacon_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("Polling every {}s", config.notifications.poll_interval_secs),
//!     Err(e) => {
//!         beacon_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CoreConfig, LoggingConfig, NotificationSyncConfig, SyncMode};
