//! Configuration Data Structures for Beacon Core.
//!
//! These structs are deserialized from `config.toml`. Missing fields take their
//! values from [`super::defaults`]; unknown fields are rejected via
//! `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use beacon_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/beacon.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/beacon.log")));
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the application state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// How the scheduler decides when to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Long-lived host context: reconcile on a fixed period.
    #[default]
    Interval,
    /// No long-lived context: reconcile only when the host reports a lifecycle event.
    OnDemand,
}

/// Settings for the notification reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationSyncConfig {
    /// Period between reconciliation cycles in [`SyncMode::Interval`]. Must be non-zero.
    #[serde(default = "defaults::default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Durable storage key holding the comma-joined seen-set.
    #[serde(default = "defaults::default_seen_set_key")]
    pub seen_set_key: String,
    #[serde(default)]
    pub mode: SyncMode,
    /// Merge ids persisted by other sessions into the resident seen-set on every cycle.
    #[serde(default = "defaults::default_bool_false")]
    pub sync_external_dismissals: bool,
    /// JSON status snapshot the demo host re-reads on every cycle.
    #[serde(default)]
    pub status_snapshot_path: Option<PathBuf>,
}

impl NotificationSyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for NotificationSyncConfig {
    fn default() -> Self {
        defaults::default_notification_sync_config()
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use beacon_core::config::{CoreConfig, SyncMode};
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [notifications]
/// poll_interval_secs = 30
/// mode = "on_demand"
/// "#;
/// let loaded: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(loaded.logging.level, "warn");
/// assert_eq!(loaded.notifications.poll_interval_secs, 30);
/// assert_eq!(loaded.notifications.mode, SyncMode::OnDemand);
/// assert_eq!(loaded.notifications.seen_set_key, "swan-notifications");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_notification_sync_config")]
    pub notifications: NotificationSyncConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            notifications: defaults::default_notification_sync_config(),
        }
    }
}
