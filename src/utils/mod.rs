//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Directory creation, recursive copy and removal, backup timestamp tags
//! - [`platform`] - Firefox base directory, home resolution and path expansion

pub mod fs;
pub mod platform;

pub use fs::{copy_dir, ensure_dir, is_within, remove_dir_all, timestamp_tag};
pub use platform::{firefox_base_dir, get_home_dir, is_windows, resolve_path};
