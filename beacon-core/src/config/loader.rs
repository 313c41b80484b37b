//! Configuration Loading for Beacon Core.
//!
//! [`ConfigLoader`] locates `config.toml`, deserializes it, fills in defaults and
//! validates the result.
//!
//! ## Configuration File Location
//!
//! 1. `$BEACON_CONFIG`, if set, names the file explicitly.
//! 2. Otherwise `config.toml` in [`get_app_config_dir()`].
//!
//! A missing file is not an error: the default [`CoreConfig`] is used instead.
//!
//! ## Validation
//!
//! - Log level and format are normalised to lowercase and checked.
//! - Relative log file paths are resolved against the application state directory.
//! - The poll interval must be non-zero.
//! - The seen-set key must be non-empty and must not contain path separators,
//!   since filesystem-backed stores use it as a file name.

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as beacon_fs;
use crate::utils::paths::{get_app_config_dir, get_app_state_dir};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "BEACON_CONFIG";

/// Namespace for configuration loading; see [`ConfigLoader::load`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the [`CoreConfig`] for the application.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] when the file exists but cannot be read.
    /// - [`ConfigError::ParseError`] for invalid TOML or unknown fields.
    /// - [`ConfigError::ValidationError`] for out-of-range values.
    /// - [`ConfigError::DirectoryUnavailable`] when no config/state directory can be determined.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let path = match env::var_os(CONFIG_PATH_ENV) {
            Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
            _ => get_app_config_dir()?.join("config.toml"),
        };
        Self::load_from_path(&path)
    }

    /// Loads and validates the configuration stored at `path`.
    ///
    /// Falls back to the defaults when the file does not exist or is blank.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => CoreConfig::default(),
            Ok(content) => toml::from_str(&content).map_err(ConfigError::ParseError)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration file at {:?}, using defaults", path);
                CoreConfig::default()
            }
            Err(e) => {
                return Err(CoreError::Config(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                }))
            }
        };

        Self::validate_config(&mut config)?;
        Ok(config)
    }

    fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        // Only touch the state directory when a relative log path actually needs it.
        let needs_state_dir = config
            .logging
            .file_path
            .as_ref()
            .is_some_and(|path| !path.is_absolute());
        let state_dir = if needs_state_dir {
            Some(get_app_state_dir()?)
        } else {
            None
        };
        Self::validate_config_with_state_dir(config, state_dir.as_deref())
    }

    /// Validation core, with the state directory injected so it can be exercised without HOME.
    pub(crate) fn validate_config_with_state_dir(
        config: &mut CoreConfig,
        state_dir: Option<&Path>,
    ) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {
                config.logging.level = level_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => {
                config.logging.format = format_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if let Some(log_path) = config.logging.file_path.clone() {
            let absolute_path = if log_path.is_absolute() {
                log_path
            } else {
                let state_dir = state_dir.ok_or_else(|| {
                    CoreError::Config(ConfigError::DirectoryUnavailable {
                        dir_type: "App State".to_string(),
                    })
                })?;
                state_dir.join(log_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                    beacon_fs::ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        let notifications = &config.notifications;
        if notifications.poll_interval_secs == 0 {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "notifications.poll_interval_secs must be greater than zero".to_string(),
            )));
        }
        let key = notifications.seen_set_key.trim();
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(CoreError::Config(ConfigError::ValidationError(format!(
                "Invalid notifications.seen_set_key: '{}'. Must be a non-empty name without path separators.",
                notifications.seen_set_key
            ))));
        }
        config.notifications.seen_set_key = key.to_string();

        Ok(())
    }
}
