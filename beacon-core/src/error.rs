//! Error handling for the Beacon core layer.
//!
//! This module defines the error types shared by every Beacon crate. They are
//! built with `thiserror` so that callers get readable `Display` output and a
//! proper `source()` chain.
//!
//! The main error type for this crate is [`CoreError`], which wraps the more
//! specific [`ConfigError`] and [`LoggingError`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use beacon_core::error::CoreError;
//!
//! fn do_something_risky() -> Result<(), CoreError> {
//!     // return Err(CoreError::Internal("Something went wrong".to_string()));
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Beacon.
///
/// Represents every failure the core layer can produce. Higher layers usually
/// wrap it (see `beacon_domain::error::DomainError`).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while installing the global `tracing` subscriber.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// Filesystem operations that failed on a known path.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors not covered by other specific variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors within the core library.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` when the error means "the thing you asked for does not exist".
    ///
    /// Persistence adapters use this to tell a first run (no stored state yet)
    /// apart from a genuine read failure.
    pub fn is_not_found_error(&self) -> bool {
        match self {
            CoreError::Config(ConfigError::NotFound { .. }) => true,
            CoreError::Filesystem { source, .. } => source.kind() == io::ErrorKind::NotFound,
            CoreError::Io(source) => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while attempting to read a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed but holds invalid values.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A configuration file was not found at any of the expected locations.
    #[error("Configuration file not found at expected locations: {locations:?}")]
    NotFound { locations: Vec<PathBuf> },

    /// A required base directory (e.g., XDG config/data home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging-related operations.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The global subscriber could not be installed or the config was unusable.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// A log filter directive could not be parsed.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),

    /// An I/O error occurred during logging, such as failing to open a log file.
    #[error("Logging I/O error: {0}")]
    IoError(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_core_error_config_variant() {
        let core_err =
            CoreError::Config(ConfigError::ValidationError("Test validation".to_string()));

        assert_eq!(
            format!("{}", core_err),
            "Configuration Error: Configuration validation failed: Test validation"
        );
        match core_err.source().unwrap().downcast_ref::<ConfigError>() {
            Some(ConfigError::ValidationError(msg)) => assert_eq!(msg, "Test validation"),
            _ => panic!("Incorrect source for CoreError::Config"),
        }
    }

    #[test]
    fn test_core_error_filesystem_variant() {
        let path = PathBuf::from("/tmp/seen.list");
        let core_err = CoreError::Filesystem {
            message: "File operation failed".to_string(),
            path: path.clone(),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(
            format!("{}", core_err),
            format!("Filesystem Error: File operation failed (Path: {:?})", path)
        );
        assert_eq!(
            core_err.source().unwrap().downcast_ref::<IoError>().unwrap().kind(),
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_logging_error_wraps_into_core_error() {
        let core_err: CoreError =
            LoggingError::InitializationFailure("already set".to_string()).into();
        assert_eq!(
            format!("{}", core_err),
            "Logging Error: Failed to initialize logging: already set"
        );
    }

    #[test]
    fn test_is_not_found_error_detects_missing_files() {
        let fs_missing = CoreError::Filesystem {
            message: "Failed to read file to string".to_string(),
            path: PathBuf::from("/nope"),
            source: IoError::new(ErrorKind::NotFound, "missing"),
        };
        let io_missing = CoreError::Io(IoError::new(ErrorKind::NotFound, "missing"));
        let config_missing = CoreError::Config(ConfigError::NotFound { locations: vec![] });

        assert!(fs_missing.is_not_found_error());
        assert!(io_missing.is_not_found_error());
        assert!(config_missing.is_not_found_error());
    }

    #[test]
    fn test_is_not_found_error_rejects_other_failures() {
        let denied = CoreError::Io(IoError::new(ErrorKind::PermissionDenied, "denied"));
        let internal = CoreError::Internal("boom".to_string());

        assert!(!denied.is_not_found_error());
        assert!(!internal.is_not_found_error());
    }

    #[test]
    fn test_config_error_directory_unavailable_variant() {
        let config_err = ConfigError::DirectoryUnavailable { dir_type: "Data Base".to_string() };
        assert_eq!(format!("{}", config_err), "Could not determine base directory for Data Base");
        assert!(config_err.source().is_none());
    }
}
