//! # Beacon Core Library (`beacon-core`)
//!
//! Foundational infrastructure shared by the Beacon crates:
//!
//! - **Error Handling**: [`CoreError`] and its specific [`ConfigError`] and [`LoggingError`].
//! - **Configuration Management**: TOML configuration through [`ConfigLoader`] and [`CoreConfig`],
//!   including the [`NotificationSyncConfig`] that drives the reconciliation engine.
//! - **Logging**: `tracing` subscriber setup for console and rolling-file output.
//! - **Utilities**: filesystem helpers (`utils::fs`) and directory resolution (`utils::paths`).
//!
//! ```rust,ignore
//! use beacon_core::{ConfigLoader, CoreError, init_logging};
//!
//! fn main() -> Result<(), CoreError> {
//!     let core_config = ConfigLoader::load()?;
//!     init_logging(&core_config.logging, false)?;
//!     tracing::info!("Beacon core initialized.");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, LoggingConfig, NotificationSyncConfig, SyncMode};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
