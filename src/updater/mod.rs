//! Writing upstream `user.js` into a profile, and reporting version status.
//!
//! # Operations
//!
//! - [`Updater::update`]: download the upstream file and overwrite the
//!   profile's `user.js`, then re-read it to report the installed version
//! - [`Updater::check_versions`]: local version, remote version and last
//!   upstream commit date side by side
//! - [`Updater::update_with_backup`]: the composite flow used by `bfup update`,
//!   an optional best-effort backup followed by [`Updater::update`]
//!
//! None of these return `Err`. Failures end up in the `ok` flag and the `log`
//! lines of the result, or as the `"n/d"` sentinel.
//!
//! # Update Flow
//!
//! ```text
//! profile empty? ── yes ──> [err] Profile not set        (no I/O at all)
//!       │ no
//! fetch snapshot (raw user.js + last commit, concurrently)
//!       │
//! content empty? ── yes ──> [err] Update: Download failed (nothing written)
//!       │ no
//! write <profile>/user.js ── error ──> [err] Update: <message>
//!       │
//! re-read user.js, parse version ──> [ok] Updated to <version>
//! ```
//!
//! The backup step of the composite flow never blocks the update: a failed
//! backup only adds a warning line.


use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backup::{BackupManager, BackupReport};
use crate::constants::{NOT_DETERMINED, USER_JS};
use crate::core::{BfupError, Marker};
use crate::remote::{RemoteEndpoints, RemoteMetadataFetcher, RemoteSource};
use crate::version::{VersionString, needs_update, parse_version};

/// Outcome of one [`Updater::update`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    /// Whether `user.js` was written.
    pub ok: bool,
    /// Human-readable log lines, each behind a [`Marker`].
    pub log: Vec<String>,
    /// Version parsed back from the written file; present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionString>,
}

impl UpdateResult {
    fn failed(line: String) -> Self {
        Self {
            ok: false,
            log: vec![line],
            version: None,
        }
    }
}

/// Local and remote versions as reported by [`Updater::check_versions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionStatus {
    /// Version of the profile's `user.js`, or `"n/d"`.
    pub local: VersionString,
    /// Version of the upstream `user.js`, or `"n/d"`.
    pub remote: VersionString,
    /// Last upstream commit touching `user.js`, or `"n/d"`.
    pub github: String,
    /// Always `"n/d"`: the browser's own version is not detected.
    pub firefox: String,
    /// Whether `remote` supersedes `local`.
    pub update_available: bool,
}

/// Whether and where the composite flow backs up before updating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoBackup {
    /// Skip the backup silently.
    Disabled,
    /// Backups are wanted but no backup folder is known; skip with a warning.
    Unconfigured,
    /// Back up into `dest_root`, pruning entries older than `retention_days`.
    Into {
        /// Backup root directory
        dest_root: PathBuf,
        /// Retention window in days
        retention_days: u32,
    },
}

/// Outcome of [`Updater::update_with_backup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateFlow {
    /// Result of the update step alone; a failed backup does not clear it.
    pub ok: bool,
    /// Backup lines, any warning, then update lines, in that order.
    pub log: Vec<String>,
    /// Installed version on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionString>,
    /// Report of the backup step, when one ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupReport>,
}

/// Coordinates remote fetches with writes into a profile directory.
///
/// Generic over the transport so tests can run against an in-memory source.
#[derive(Debug, Clone)]
pub struct Updater<S> {
    fetcher: RemoteMetadataFetcher<S>,
}

impl<S: RemoteSource> Updater<S> {
    /// Updater fetching through `source` from `endpoints`.
    pub const fn new(source: S, endpoints: RemoteEndpoints) -> Self {
        Self {
            fetcher: RemoteMetadataFetcher::new(source, endpoints),
        }
    }

    /// The underlying snapshot fetcher.
    pub const fn fetcher(&self) -> &RemoteMetadataFetcher<S> {
        &self.fetcher
    }

    /// Replace `<profile_path>/user.js` with the upstream file.
    ///
    /// An empty `profile_path` fails with `[err] Profile not set` before any
    /// network or filesystem access. A failed download writes nothing.
    pub async fn update(&self, profile_path: &Path) -> UpdateResult {
        if profile_path.as_os_str().is_empty() {
            return UpdateResult::failed(Marker::Err.line(BfupError::ProfileNotSet));
        }

        let snapshot = self.fetcher.get_remote_meta().await;
        if !snapshot.is_available() {
            return UpdateResult::failed(
                Marker::Err.line(format_args!("Update: {}", BfupError::DownloadFailed)),
            );
        }

        match write_user_js(profile_path, &snapshot.content).await {
            Ok(()) => {
                let version = local_version(profile_path).await;
                info!("Updated {} to {}", profile_path.display(), version);
                UpdateResult {
                    ok: true,
                    log: vec![Marker::Ok.line(format_args!("Updated to {version}"))],
                    version: Some(version),
                }
            }
            Err(e) => {
                warn!("Update of {} failed: {:#}", profile_path.display(), e);
                UpdateResult::failed(Marker::Err.line(format_args!("Update: {e:#}")))
            }
        }
    }

    /// Compare the profile's `user.js` (when a profile is given) with upstream.
    ///
    /// The remote fetch and the local read run concurrently. Without a profile,
    /// or when its `user.js` is missing or unreadable, `local` is `"n/d"`.
    pub async fn check_versions(&self, profile_path: Option<&Path>) -> VersionStatus {
        let local = async {
            match profile_path {
                Some(path) if !path.as_os_str().is_empty() => local_version(path).await,
                _ => VersionString::NotDetermined,
            }
        };
        let (snapshot, local) = tokio::join!(self.fetcher.get_remote_meta(), local);

        VersionStatus {
            update_available: needs_update(&local, &snapshot.version),
            local,
            remote: snapshot.version,
            github: snapshot.commit_date,
            firefox: NOT_DETERMINED.to_string(),
        }
    }

    /// Best-effort backup, then [`update`](Self::update).
    ///
    /// The backup always finishes before `user.js` is touched. Its outcome is
    /// logged but never stops the update. An empty `profile_path` skips the
    /// backup and fails like [`update`](Self::update) does.
    pub async fn update_with_backup(&self, profile_path: &Path, auto_backup: AutoBackup) -> UpdateFlow {
        let mut log = Vec::new();
        let mut backup = None;

        if !profile_path.as_os_str().is_empty() {
            match auto_backup {
                AutoBackup::Disabled => debug!("Automatic backup disabled"),
                AutoBackup::Unconfigured => {
                    log.push(Marker::Warn.line("Backup skipped, backup folder not configured"));
                }
                AutoBackup::Into {
                    dest_root,
                    retention_days,
                } => {
                    let report = run_backup(BackupManager::new(profile_path, dest_root), retention_days).await;
                    log.extend(report.log.iter().cloned());
                    if !report.ok {
                        log.push(Marker::Warn.line("Backup failed, continuing with update"));
                    }
                    backup = Some(report);
                }
            }
        }

        let result = self.update(profile_path).await;
        log.extend(result.log);
        UpdateFlow {
            ok: result.ok,
            log,
            version: result.version,
            backup,
        }
    }
}

/// Version of `<profile_path>/user.js`; `"n/d"` when it is missing or unreadable.
pub async fn local_version(profile_path: &Path) -> VersionString {
    let path = profile_path.join(USER_JS);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => parse_version(&content),
        Err(e) => {
            debug!("Cannot read {}: {}", path.display(), e);
            VersionString::NotDetermined
        }
    }
}

/// Create or truncate `<profile_path>/user.js` with `content`, byte for byte.
async fn write_user_js(profile_path: &Path, content: &str) -> Result<()> {
    let path = profile_path.join(USER_JS);
    debug!("Writing {} bytes to {}", content.len(), path.display());
    tokio::fs::write(&path, content.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Run the blocking copy off the async executor.
async fn run_backup(manager: BackupManager, retention_days: u32) -> BackupReport {
    tokio::task::spawn_blocking(move || manager.backup(retention_days))
        .await
        .unwrap_or_else(|e| BackupReport {
            ok: false,
            log: vec![Marker::Err.line(format_args!("Backup: {e}"))],
            ..BackupReport::default()
        })
}
