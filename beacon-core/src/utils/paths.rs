//! XDG Base Directory and Application-Specific Path Resolution.
//!
//! Resolves the directories Beacon reads its configuration from and keeps its
//! durable state in. Relies on the `directories-next` crate.
//!
//! - [`get_app_config_dir()`]: e.g. `~/.config/beacon`.
//! - [`get_app_data_dir()`]: e.g. `~/.local/share/beacon`. The seen-set store lives here.
//! - [`get_app_state_dir()`]: e.g. `~/.local/state/Beacon/beacon`. Relative log files resolve here.
//!
//! All functions return [`CoreError::Config`] with [`ConfigError::DirectoryUnavailable`]
//! when the directory cannot be determined (typically no HOME).

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Beacon";
const APPLICATION: &str = "beacon";

fn project_dirs(dir_type: &str) -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: dir_type.to_string(),
        })
    })
}

/// Returns the base directory for user state files (`$XDG_STATE_HOME` on Linux).
///
/// `directories-next` has no state directory, so on Linux this honours
/// `XDG_STATE_HOME` and falls back to `~/.local/state`; elsewhere it uses the
/// local data directory.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| {
            CoreError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "State Base".to_string(),
            })
        })
}

/// Returns the application-specific configuration directory.
///
/// # Examples
/// ```
/// match beacon_core::utils::paths::get_app_config_dir() {
///     Ok(path) => println!("App config directory: {}", path.display()),
///     Err(e) => eprintln!("Error getting app config dir: {}", e),
/// }
/// ```
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Config").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the application-specific data directory.
pub fn get_app_data_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Data").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Returns the application-specific state directory, built from
/// [`get_state_base_dir()`] plus `ORGANIZATION/APPLICATION`.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base_state| base_state.join(ORGANIZATION).join(APPLICATION))
}

#[cfg(test)]
mod tests {
    use super::*;

    // HOME may be unset on CI; DirectoryUnavailable is the only acceptable failure.
    fn assert_is_valid_path(res: Result<PathBuf, CoreError>, dir_type: &str) {
        match res {
            Ok(path) => {
                assert!(path.is_absolute(), "Path for {} is not absolute: {:?}", dir_type, path);
            }
            Err(CoreError::Config(ConfigError::DirectoryUnavailable { .. })) => {
                eprintln!("Could not determine path for {}", dir_type);
            }
            Err(e) => panic!("Expected Ok or DirectoryUnavailable for {}, got {:?}", dir_type, e),
        }
    }

    #[test]
    fn test_get_app_config_dir() {
        assert_is_valid_path(get_app_config_dir(), "App Config");
    }

    #[test]
    fn test_get_app_data_dir() {
        assert_is_valid_path(get_app_data_dir(), "App Data");
    }

    #[test]
    fn test_get_app_state_dir_ends_with_application() {
        if let Ok(path) = get_app_state_dir() {
            assert!(path.ends_with("Beacon/beacon"));
        }
    }
}
