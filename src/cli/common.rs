//! Shared plumbing for CLI commands: settings lookup, flag/config precedence,
//! and text or JSON output.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Settings;
use crate::core::Marker;
use crate::profile::ProfileLocator;
use crate::remote::HttpSource;
use crate::updater::Updater;

/// How command results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable lines.
    #[default]
    Text,
    /// The result structure as pretty-printed JSON on stdout.
    Json,
}

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Loaded settings (defaults when no file exists).
    pub settings: Settings,
    /// Location the settings were read from and are saved to.
    pub config_path: PathBuf,
    /// Selected output format.
    pub format: OutputFormat,
    /// `--profiles-dir`, taking precedence over the configured one.
    pub profiles_dir: Option<PathBuf>,
}

impl CommandContext {
    /// Load settings from `config_path`, or from the default location.
    pub async fn load(
        config_path: Option<PathBuf>,
        format: OutputFormat,
        profiles_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let mut ctx = Self::unloaded(config_path, format, profiles_dir)?;
        ctx.settings = Settings::load_with_optional(Some(ctx.config_path.clone())).await?;
        Ok(ctx)
    }

    /// Context with default settings, without reading the file.
    ///
    /// Used by commands that must work even when the file is unreadable.
    pub fn unloaded(
        config_path: Option<PathBuf>,
        format: OutputFormat,
        profiles_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => Settings::default_path()?,
        };

        Ok(Self {
            settings: Settings::default(),
            config_path,
            format,
            profiles_dir,
        })
    }

    /// `--profile` if given, else the configured `profile_path`.
    pub fn profile_path(&self, flag: Option<PathBuf>) -> Result<Option<PathBuf>> {
        match flag {
            Some(path) => Ok(Some(path)),
            None => self.settings.profile_path().context("Invalid profile_path in config"),
        }
    }

    /// `--dest`/`--backup-dir` if given, else the configured `backup_folder`.
    pub fn backup_folder(&self, flag: Option<PathBuf>) -> Result<Option<PathBuf>> {
        match flag {
            Some(path) => Ok(Some(path)),
            None => self.settings.backup_folder().context("Invalid backup_folder in config"),
        }
    }

    /// `--retention-days` if given, else the configured retention.
    #[must_use]
    pub fn retention_days(&self, flag: Option<u32>) -> u32 {
        flag.unwrap_or(self.settings.retention_days)
    }

    /// Profile locator for `--profiles-dir`, the configured directory, or the
    /// platform default, in that order.
    pub fn locator(&self) -> Result<ProfileLocator> {
        if let Some(dir) = &self.profiles_dir {
            return Ok(ProfileLocator::new(dir.clone()));
        }
        Ok(match self.settings.profiles_dir().context("Invalid profiles_dir in config")? {
            Some(dir) => ProfileLocator::new(dir),
            None => ProfileLocator::platform_default(),
        })
    }

    /// Updater talking to the configured endpoints over HTTP.
    pub fn updater(&self) -> Result<Updater<HttpSource>> {
        Ok(Updater::new(HttpSource::new()?, self.settings.endpoints()))
    }

    /// Print `value` as JSON when JSON output was requested.
    ///
    /// Returns `true` when it printed, so text rendering can be skipped.
    pub fn emit_json<T: Serialize>(&self, value: &T) -> Result<bool> {
        if self.format != OutputFormat::Json {
            return Ok(false);
        }
        println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
        Ok(true)
    }
}

/// Print log lines, colored by their marker.
pub fn print_log(lines: &[String]) {
    for line in lines {
        let rendered = match Marker::of(line) {
            Some(Marker::Ok) => line.green(),
            Some(Marker::Err) => line.red(),
            Some(Marker::Warn) => line.yellow(),
            Some(Marker::Info) => line.cyan(),
            None => line.normal(),
        };
        println!("{rendered}");
    }
}
