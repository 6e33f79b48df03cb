//! The user's settings file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::DEFAULT_RETENTION_DAYS;
use crate::core::BfupError;
use crate::remote::RemoteEndpoints;
use crate::utils::platform::resolve_path;

const fn default_auto_backup() -> bool {
    true
}

const fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

const fn is_true(value: &bool) -> bool {
    *value
}

fn is_default_retention(days: &u32) -> bool {
    *days == DEFAULT_RETENTION_DAYS
}

/// Keys accepted by [`Settings::set`].
pub const KEYS: &[&str] = &[
    "profile_path",
    "backup_folder",
    "auto_backup",
    "retention_days",
    "profiles_dir",
    "remote.raw_url",
    "remote.commits_url",
];

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Profile used when `--profile` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<String>,

    /// Backup root used when `--dest` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_folder: Option<String>,

    /// Back up before every `bfup update`.
    #[serde(default = "default_auto_backup", skip_serializing_if = "is_true")]
    pub auto_backup: bool,

    /// Age in days after which backups are pruned.
    #[serde(default = "default_retention_days", skip_serializing_if = "is_default_retention")]
    pub retention_days: u32,

    /// Directory holding `profiles.ini`, replacing the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<String>,

    /// Upstream endpoint overrides.
    #[serde(default, skip_serializing_if = "RemoteSettings::is_empty")]
    pub remote: RemoteSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile_path: None,
            backup_folder: None,
            auto_backup: default_auto_backup(),
            retention_days: default_retention_days(),
            profiles_dir: None,
            remote: RemoteSettings::default(),
        }
    }
}

/// `[remote]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Raw `user.js` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_url: Option<String>,

    /// Commits API URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits_url: Option<String>,
}

impl RemoteSettings {
    const fn is_empty(&self) -> bool {
        self.raw_url.is_none() && self.commits_url.is_none()
    }
}

impl Settings {
    /// Load from `path` when given, otherwise from [`default_path`](Self::default_path).
    ///
    /// A missing file yields the defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load from a specific file, which must exist.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .map_err(BfupError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Write as TOML, creating parent directories. Owner-only on Unix.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        write_private(path, &content).await
    }

    /// Platform location of `config.toml`.
    ///
    /// - **Windows**: `%LOCALAPPDATA%\bfup\config.toml`
    /// - **Unix/macOS**: `~/.bfup/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("bfup")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".bfup")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Set `key` (one of [`KEYS`]) from its string form.
    ///
    /// An empty value clears optional keys and restores the default of the others.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = || (!value.is_empty()).then(|| value.to_string());
        match key {
            "profile_path" => self.profile_path = optional(),
            "backup_folder" => self.backup_folder = optional(),
            "profiles_dir" => self.profiles_dir = optional(),
            "remote.raw_url" => self.remote.raw_url = optional(),
            "remote.commits_url" => self.remote.commits_url = optional(),
            "auto_backup" => {
                self.auto_backup = match value {
                    "" => default_auto_backup(),
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => return Err(invalid_value(key, other, "expected true or false")),
                };
            }
            "retention_days" => {
                self.retention_days = if value.is_empty() {
                    default_retention_days()
                } else {
                    value
                        .parse()
                        .map_err(|_| invalid_value(key, value, "expected a whole number of days"))?
                };
            }
            _ => {
                return Err(BfupError::ConfigError {
                    message: format!("Unknown key '{key}'. Valid keys: {}", KEYS.join(", ")),
                }
                .into());
            }
        }
        Ok(())
    }

    /// `profile_path` with `~` and environment variables expanded.
    pub fn profile_path(&self) -> Result<Option<PathBuf>> {
        self.profile_path.as_deref().map(resolve_path).transpose()
    }

    /// `backup_folder` with `~` and environment variables expanded.
    pub fn backup_folder(&self) -> Result<Option<PathBuf>> {
        self.backup_folder.as_deref().map(resolve_path).transpose()
    }

    /// `profiles_dir` with `~` and environment variables expanded.
    pub fn profiles_dir(&self) -> Result<Option<PathBuf>> {
        self.profiles_dir.as_deref().map(resolve_path).transpose()
    }

    /// Upstream endpoints, built-in defaults filled in where not overridden.
    #[must_use]
    pub fn endpoints(&self) -> RemoteEndpoints {
        let defaults = RemoteEndpoints::default();
        RemoteEndpoints {
            raw_url: self.remote.raw_url.clone().unwrap_or(defaults.raw_url),
            commits_url: self.remote.commits_url.clone().unwrap_or(defaults.commits_url),
        }
    }
}

/// Commented starting point written by `bfup config init`.
pub const EXAMPLE: &str = r#"# bfup settings
#
# Command-line flags take precedence over everything here.

# Profile updated by `bfup update` when --profile is not given
# profile_path = "~/.mozilla/firefox/abcd1234.default-release"

# Where `bfup backup` and the automatic pre-update backup go
# backup_folder = "~/BetterfoxBackups"

# Back up the profile before every update
auto_backup = true

# Backups older than this many days are deleted after each new backup
retention_days = 60

# Directory containing profiles.ini, when Firefox lives somewhere unusual
# profiles_dir = "~/.mozilla/firefox"

# [remote]
# raw_url = "https://raw.githubusercontent.com/yokoffing/Betterfox/main/user.js"
# commits_url = "https://api.github.com/repos/yokoffing/Betterfox/commits?path=user.js&per_page=1"
"#;

/// Write `content` to `path`, owner read/write only on Unix.
pub async fn write_private(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read permissions for {}", path.display()))?
            .permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)
            .await
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

fn invalid_value(key: &str, value: &str, expected: &str) -> anyhow::Error {
    BfupError::ConfigError {
        message: format!("Invalid value '{value}' for {key}: {expected}"),
    }
    .into()
}
