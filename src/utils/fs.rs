//! File system utilities for profile backups and `user.js` writes.
//!
//! Every helper returns `anyhow::Result` with the affected path in the error
//! context, so a failure deep inside a recursive copy still tells the user
//! which file broke.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bfup_cli::utils::fs::{copy_dir, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("backups"))?;
//! copy_dir(Path::new("profile"), Path::new("backups/backup-now"))?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filesystem-safe form of an instant: RFC 3339 with millisecond precision,
/// `:` and `.` replaced by `-`.
///
/// `2024-05-01T10:20:30.123Z` becomes `2024-05-01T10-20-30-123Z`.
#[must_use]
pub fn timestamp_tag(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true).replace([':', '.'], "-")
}

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Returns
///
/// - `Ok(())` if the directory exists or was successfully created
/// - `Err` if the path exists but is not a directory, or creation fails
pub fn ensure_dir(path: &Path) -> Result<()> {
    let safe_path = crate::utils::platform::windows_long_path(path);

    if !safe_path.exists() {
        fs::create_dir_all(&safe_path).with_context(|| {
            let platform_help = if crate::utils::platform::is_windows() {
                "On Windows: Check that the path length is < 260 chars or that long path support is enabled"
            } else {
                "Check directory permissions and path validity"
            };

            format!("Failed to create directory: {}\n\n{}", path.display(), platform_help)
        })?;
    } else if !safe_path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Recursively copies a directory tree to a new location.
///
/// Performs a full deep copy: every regular file is copied with its
/// permissions, every subdirectory is recreated, and symbolic links are
/// recreated as links (never followed, never skipped). The copy stops at the
/// first failure and leaves whatever was already copied in place.
///
/// # Arguments
///
/// * `src` - The directory to copy from
/// * `dst` - The directory to copy into; created if missing
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(anyhow::anyhow!("Source is not a directory: {}", src.display()));
    }
    ensure_dir(dst)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry =
            entry.with_context(|| format!("Failed to read directory tree: {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("Path escaped source tree: {}", entry.path().display()))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            ensure_dir(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }

    Ok(())
}

/// Recreate the link at `src` as a new link at `dst` pointing to the same target.
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link_target =
        fs::read_link(src).with_context(|| format!("Failed to read symlink: {}", src.display()))?;

    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(&link_target, dst);

    #[cfg(windows)]
    let result = if src.is_dir() {
        std::os::windows::fs::symlink_dir(&link_target, dst)
    } else {
        std::os::windows::fs::symlink_file(&link_target, dst)
    };

    result.with_context(|| {
        format!("Failed to recreate symlink {} -> {}", dst.display(), link_target.display())
    })
}

/// Whether `path` is `root` or lies beneath it, with symlinks resolved.
///
/// `root` must exist. `path` need not: its deepest existing ancestor is
/// resolved and the remaining components are appended unchanged.
pub fn is_within(path: &Path, root: &Path) -> Result<bool> {
    let root = fs::canonicalize(root)
        .with_context(|| format!("Failed to resolve path: {}", root.display()))?;
    Ok(resolve_lenient(path)?.starts_with(&root))
}

fn resolve_lenient(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(resolved) = fs::canonicalize(existing) {
            return Ok(missing.iter().rev().fold(resolved, |acc: PathBuf, part| acc.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute.clone()),
        }
    }
}

/// Recursively removes a directory and all its contents.
///
/// Missing directories are not an error. Symlinks are removed, never followed.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to inspect {}", path.display()));
        }
    };

    if meta.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))
    } else {
        fs::remove_file(path).with_context(|| format!("Failed to remove file: {}", path.display()))
    }
}
