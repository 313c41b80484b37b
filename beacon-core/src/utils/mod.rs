//! General Utilities for Beacon Core.
//!
//! - [`fs`]: filesystem helpers, including atomic file replacement.
//! - [`paths`]: XDG and application-specific directory resolution.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_to_string, write_string_atomically, write_string_to_file};
