//! Filesystem Utilities.
//!
//! Thin wrappers over `std::fs` that map failures into [`CoreError::Filesystem`]
//! with the offending path attached.

use crate::error::CoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// Ensures that a directory exists at the given path, creating parents as needed.
///
/// # Errors
///
/// Returns [`CoreError::Filesystem`] if the path exists but is not a directory,
/// or if directory creation fails.
///
/// # Examples
///
/// ```no_run
/// # use beacon_core::utils::fs::ensure_dir_exists;
/// # use tempfile::tempdir;
/// let temp_dir = tempdir().unwrap();
/// let dir_path = temp_dir.path().join("beacon_data");
/// ensure_dir_exists(&dir_path).unwrap();
/// assert!(dir_path.is_dir());
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if !path.is_dir() {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "Path exists but is not a directory",
                ),
            })
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Reads the entire contents of a file into a string.
pub fn read_to_string(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| CoreError::Filesystem {
        message: "Failed to read file to string".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

/// Writes a string to a file, creating or truncating it.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<(), CoreError> {
    fs::write(path, content).map_err(|e| CoreError::Filesystem {
        message: "Failed to write string to file".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

/// Returns the sibling path used as the staging file for an atomic replace of `path`.
///
/// The staging file lives in the same directory so the final `rename` never
/// crosses a filesystem boundary.
pub fn staging_path_for(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}

/// Replaces the contents of `path` atomically: write a staging file, then rename it over `path`.
///
/// Readers observe either the old or the new content, never a partial write.
pub fn write_string_atomically(path: &Path, content: &str) -> Result<(), CoreError> {
    let staging = staging_path_for(path);
    write_string_to_file(&staging, content)?;
    fs::rename(&staging, path).map_err(|e| CoreError::Filesystem {
        message: "Failed to move staged file into place".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}
