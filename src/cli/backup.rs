//! Back up a profile and prune old backups.
//!
//! ```bash
//! bfup backup --profile ~/.mozilla/firefox/abcd.default-release --dest ~/fx-backups
//! bfup backup --retention-days 30     # profile and dest from the config
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::{CommandContext, print_log};
use crate::backup::BackupManager;
use crate::core::BfupError;

/// Copy a profile into `<dest>/backup-<timestamp>` and prune expired backups.
#[derive(Args, Debug)]
pub struct BackupCommand {
    /// Profile directory; falls back to `profile_path` from the config
    #[arg(short, long, value_name = "DIR")]
    profile: Option<PathBuf>,

    /// Backup root; falls back to `backup_folder` from the config
    #[arg(short, long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Delete backups older than this many days (default: config, then 60)
    #[arg(long, value_name = "DAYS")]
    retention_days: Option<u32>,
}

impl BackupCommand {
    /// Run the backup and print its log. Fails when the backup did not complete.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let profile = ctx.profile_path(self.profile)?.unwrap_or_default();
        let dest = ctx.backup_folder(self.dest)?.unwrap_or_default();
        let retention_days = ctx.retention_days(self.retention_days);

        let target_missing = profile.as_os_str().is_empty() || dest.as_os_str().is_empty();

        let manager = BackupManager::new(profile, dest);
        let report = tokio::task::spawn_blocking(move || manager.backup(retention_days)).await?;

        if !ctx.emit_json(&report)? {
            print_log(&report.log);
        }

        if report.ok {
            Ok(())
        } else if target_missing {
            Err(BfupError::BackupTargetMissing.into())
        } else {
            Err(BfupError::Other {
                message: "Backup failed".to_string(),
            }
            .into())
        }
    }
}
