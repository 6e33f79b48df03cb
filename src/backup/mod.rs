//! Timestamped profile backups and the retention sweep that follows them.
//!
//! A backup is a plain directory `backup-<tag>` under a backup root, holding a
//! full recursive copy of a profile directory. Nothing else records it: the
//! directory name identifies the backup and its modification time dates it.
//!
//! # Process
//!
//! 1. Refuse a backup root that lies inside the profile, before touching the disk
//! 2. Ensure the backup root exists
//! 3. Derive a tag from the current instant ([`timestamp_tag`])
//! 4. Deep-copy the profile into `<root>/backup-<tag>`
//! 5. Delete every `backup-*` entry under the root older than the retention window
//!
//! The report's log starts with `[ok] Backup created: <dir>`, followed by one
//! `[info] Removed expired backup: <dir>` line per pruned entry.
//!
//! Any failure stops the sequence and is reported in the result; whatever was
//! already copied or deleted stays that way.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bfup_cli::backup::BackupManager;
//!
//! let manager = BackupManager::new("/home/me/.mozilla/firefox/abcd.default", "/home/me/fx-backups");
//! let report = manager.backup(60);
//! for line in &report.log {
//!     println!("{line}");
//! }
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::constants::{BACKUP_PREFIX, SECONDS_PER_DAY};
use crate::core::{BfupError, Marker};
use crate::utils::fs::{copy_dir, ensure_dir, is_within, remove_dir_all, timestamp_tag};

/// Outcome of one [`BackupManager::backup`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    /// Whether the copy and the sweep both completed.
    pub ok: bool,
    /// Human-readable log lines, each behind a [`Marker`].
    pub log: Vec<String>,
    /// Directory created by this call, when the copy got that far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    /// Entries removed by the retention sweep.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pruned: Vec<PathBuf>,
}

impl BackupReport {
    fn failed(line: String) -> Self {
        Self {
            ok: false,
            log: vec![line],
            ..Self::default()
        }
    }
}

/// Copies one profile into one backup root.
///
/// Both paths are taken as given; the manager never consults configuration or
/// the environment.
#[derive(Debug, Clone)]
pub struct BackupManager {
    profile_path: PathBuf,
    dest_root: PathBuf,
}

impl BackupManager {
    /// Manager backing up `profile_path` into `dest_root`.
    pub fn new(profile_path: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            profile_path: profile_path.into(),
            dest_root: dest_root.into(),
        }
    }

    /// Profile directory being backed up.
    #[must_use]
    pub fn profile_path(&self) -> &Path {
        &self.profile_path
    }

    /// Root holding the `backup-*` directories.
    #[must_use]
    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Create a new backup, then prune backups older than `retention_days`.
    ///
    /// Never fails: an empty profile or root path yields
    /// `[err] Profile or backup folder missing` without touching the disk, and
    /// any filesystem error yields `[err] Backup: <message>`.
    pub fn backup(&self, retention_days: u32) -> BackupReport {
        self.backup_at(retention_days, Utc::now())
    }

    fn backup_at(&self, retention_days: u32, now: DateTime<Utc>) -> BackupReport {
        if self.profile_path.as_os_str().is_empty() || self.dest_root.as_os_str().is_empty() {
            return BackupReport::failed(Marker::Err.line(BfupError::BackupTargetMissing));
        }

        let target = self.dest_root.join(format!("{BACKUP_PREFIX}{}", timestamp_tag(now)));
        let result = self.copy_into(&target).and_then(|()| {
            sweep_expired(&self.dest_root, retention_days, SystemTime::from(now))
        });

        match result {
            Ok(pruned) => {
                info!("Backup created at {}", target.display());
                let mut log = vec![Marker::Ok.line(format_args!("Backup created: {}", target.display()))];
                log.extend(
                    pruned
                        .iter()
                        .map(|p| Marker::Info.line(format_args!("Removed expired backup: {}", p.display()))),
                );
                BackupReport {
                    ok: true,
                    log,
                    backup_dir: Some(target),
                    pruned,
                }
            }
            Err(e) => {
                warn!("Backup of {} failed: {:#}", self.profile_path.display(), e);
                let backup_dir = target.exists().then_some(target);
                BackupReport {
                    backup_dir,
                    ..BackupReport::failed(Marker::Err.line(format_args!("Backup: {e:#}")))
                }
            }
        }
    }

    fn copy_into(&self, target: &Path) -> Result<()> {
        if is_within(&self.dest_root, &self.profile_path)? {
            anyhow::bail!(
                "Cannot back up {} into its own subdirectory {}",
                self.profile_path.display(),
                self.dest_root.display()
            );
        }
        ensure_dir(&self.dest_root)?;
        debug!("Copying {} to {}", self.profile_path.display(), target.display());
        copy_dir(&self.profile_path, target)
    }
}

/// Delete every `backup-*` entry directly under `dest_root` whose age at `now`
/// exceeds `retention_days`. Returns the removed paths.
///
/// Entries are selected by name prefix only, whatever they contain. The first
/// failure aborts the sweep.
pub fn sweep_expired(
    dest_root: &Path,
    retention_days: u32,
    now: SystemTime,
) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dest_root)
        .with_context(|| format!("Failed to list backup folder: {}", dest_root.display()))?;

    let mut pruned = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to list backup folder: {}", dest_root.display()))?;
        if !entry.file_name().to_string_lossy().starts_with(BACKUP_PREFIX) {
            continue;
        }

        let path = entry.path();
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time: {}", path.display()))?;

        if is_expired(modified, now, retention_days) {
            info!("Removing expired backup {}", path.display());
            remove_dir_all(&path)?;
            pruned.push(path);
        }
    }

    Ok(pruned)
}

/// Whether an entry last modified at `modified` is strictly older than
/// `retention_days` at `now`. Entries dated in the future are never expired.
#[must_use]
pub fn is_expired(modified: SystemTime, now: SystemTime, retention_days: u32) -> bool {
    now.duration_since(modified)
        .is_ok_and(|age| age.as_secs_f64() / SECONDS_PER_DAY > f64::from(retention_days))
}
