//! BFUP - Betterfox updater
//!
//! Keeps the `user.js` of a Firefox profile in sync with the upstream
//! [Betterfox](https://github.com/yokoffing/Betterfox) copy, with timestamped
//! profile backups and age-based pruning of old ones.
//!
//! # Architecture Overview
//!
//! ```text
//!            ┌──────────────┐
//!            │   cli (bfup) │  flags + config.toml, text/JSON output
//!            └──────┬───────┘
//!      ┌────────────┼──────────────┐
//!      ▼            ▼              ▼
//!  profile       updater  ───▶  backup
//!  (profiles.ini)   │
//!                   ▼
//!                remote ───▶ version
//!           (raw user.js + last commit)
//! ```
//!
//! - [`profile`] reads `profiles.ini` and yields profile directories
//! - [`remote`] fetches the upstream file and its last commit concurrently
//! - [`version`] extracts the `Betterfox vX.Y` marker from `user.js` text
//! - [`backup`] copies a profile into `backup-<timestamp>` and prunes expired backups
//! - [`updater`] writes the upstream file into a profile and reports versions
//!
//! # Failure Model
//!
//! The four boundary operations never return `Err`:
//!
//! - [`profile::ProfileLocator::list_profiles`] returns an empty list
//! - [`updater::Updater::check_versions`] reports `"n/d"` for what it cannot determine
//! - [`updater::Updater::update`] and [`backup::BackupManager::backup`] report
//!   `ok: false` with `[err] ...` log lines
//!
//! Library operations take every path and retention window as an argument.
//! Only the [`cli`] layer reads [`config`] or the environment.
//!
//! # Example
//!
//! ```rust,no_run
//! use bfup_cli::remote::{HttpSource, RemoteEndpoints};
//! use bfup_cli::updater::Updater;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let updater = Updater::new(HttpSource::new()?, RemoteEndpoints::default());
//! let status = updater.check_versions(Some(Path::new("/profiles/abcd.default"))).await;
//! if status.update_available {
//!     let result = updater.update(Path::new("/profiles/abcd.default")).await;
//!     println!("{}", result.log.join("\n"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod profile;
pub mod remote;
pub mod updater;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
