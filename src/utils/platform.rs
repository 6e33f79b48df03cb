//! Platform-specific utilities and cross-platform compatibility helpers
//!
//! Abstracts the differences BFUP cares about: where Firefox keeps its
//! profile registry, home directory resolution, `~`/environment expansion in
//! user-supplied paths, and Windows long paths.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bfup_cli::utils::platform::{firefox_base_dir, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! println!("profiles.ini lives in {}", firefox_base_dir().display());
//! let backups = resolve_path("~/BetterfoxBackups")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Returns true if running on Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the home directory path for the current user.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Directory holding Firefox's `profiles.ini` for the current user.
///
/// - **Windows**: `%APPDATA%\Mozilla\Firefox`
/// - **macOS**: `~/Library/Application Support/Firefox`
/// - **Other Unix**: `~/.mozilla/firefox`
///
/// A missing `APPDATA` or home directory yields an empty path rather than an
/// error; profile discovery treats an empty base as "no profiles".
#[must_use]
pub fn firefox_base_dir() -> PathBuf {
    if is_windows() {
        let app_data = std::env::var("APPDATA").unwrap_or_default();
        if app_data.is_empty() {
            return PathBuf::new();
        }
        return Path::new(&app_data).join("Mozilla").join("Firefox");
    }

    let Some(home) = dirs::home_dir() else {
        return PathBuf::new();
    };

    if cfg!(target_os = "macos") {
        home.join("Library").join("Application Support").join("Firefox")
    } else {
        home.join(".mozilla").join("firefox")
    }
}

/// Resolves a user-supplied path, expanding `~/` and environment variables.
///
/// Only `~/` (the current user's home) is supported for tilde expansion.
/// `$VAR`/`${VAR}` are expanded everywhere; `%VAR%` additionally on Windows.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = if let Some(stripped) = path.strip_prefix("~/") {
        get_home_dir()?.join(stripped)
    } else if path == "~" {
        get_home_dir()?
    } else if path.starts_with('~') {
        return Err(anyhow::anyhow!(
            "Invalid path: {path}\n\n\
            Tilde expansion only supports '~/' for home directory.\n\
            Use '~/' followed by a relative path, like '~/BetterfoxBackups'"
        ));
    } else {
        PathBuf::from(path)
    };

    let path_str = expanded.to_string_lossy();

    let path_str = if is_windows() && path_str.contains('%') {
        expand_windows_vars(&path_str)
    } else {
        path_str.into_owned()
    };

    let expanded_str = shellexpand::env(&path_str)
        .with_context(|| {
            format!(
                "Failed to expand environment variables in path: {path_str}\n\n\
                Check for undefined variables or invalid $VAR syntax"
            )
        })?
        .into_owned();

    Ok(windows_long_path(Path::new(&expanded_str)))
}

/// Replace `%VAR%` occurrences with their values, leaving unknown variables intact.
fn expand_windows_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('%') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) if !name.is_empty() => result.push_str(&value),
                    _ => {
                        result.push('%');
                        result.push_str(name);
                        result.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

/// Converts a path to use the `\\?\` prefix when it exceeds 260 characters.
#[cfg(windows)]
pub fn windows_long_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if path_str.len() > 260 && !path_str.starts_with(r"\\?\") {
        let absolute_path = if path.is_relative() {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(path)
        } else {
            path.to_path_buf()
        };

        let absolute_str = absolute_path.to_string_lossy();
        if absolute_str.len() > 260 {
            if let Some(stripped) = absolute_str.strip_prefix(r"\\") {
                PathBuf::from(format!(r"\\?\UNC\{}", stripped))
            } else {
                PathBuf::from(format!(r"\\?\{}", absolute_str))
            }
        } else {
            absolute_path
        }
    } else {
        path.to_path_buf()
    }
}

/// No-op on platforms without a path length limit.
#[cfg(not(windows))]
#[must_use]
pub fn windows_long_path(path: &Path) -> PathBuf {
    path.to_path_buf()
}
