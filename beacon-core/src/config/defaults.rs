//! Default configuration values for Beacon Core.
//!
//! Referenced from `#[serde(default = "...")]` attributes in [`super::types`].

use crate::config::{LoggingConfig, NotificationSyncConfig, SyncMode};
use std::path::PathBuf;

/// Storage key the seen-set has always been written under.
pub const DEFAULT_SEEN_SET_KEY: &str = "swan-notifications";

/// Poll period for interval mode, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

pub(crate) fn default_notification_sync_config() -> NotificationSyncConfig {
    NotificationSyncConfig {
        poll_interval_secs: default_poll_interval_secs(),
        seen_set_key: default_seen_set_key(),
        mode: SyncMode::default(),
        sync_external_dismissals: default_bool_false(),
        status_snapshot_path: None,
    }
}

pub(crate) fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

pub(crate) fn default_seen_set_key() -> String {
    DEFAULT_SEEN_SET_KEY.to_string()
}

pub(crate) fn default_bool_false() -> bool {
    false
}
