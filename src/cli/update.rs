//! Install the upstream `user.js` into a profile.
//!
//! With auto-backup enabled (the default), the profile is first copied into the
//! backup folder. A failed backup is reported and the update goes ahead anyway.
//!
//! ```bash
//! bfup update --profile ~/.mozilla/firefox/abcd.default-release --backup-dir ~/fx-backups
//! bfup update --no-backup
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::{CommandContext, print_log};
use crate::core::BfupError;
use crate::updater::AutoBackup;

/// Overwrite the profile's `user.js` with the latest upstream version.
#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Profile directory; falls back to `profile_path` from the config
    #[arg(short, long, value_name = "DIR")]
    profile: Option<PathBuf>,

    /// Backup root for the pre-update backup; falls back to `backup_folder`
    #[arg(long, value_name = "DIR")]
    backup_dir: Option<PathBuf>,

    /// Skip the pre-update backup even if `auto_backup` is enabled
    #[arg(long)]
    no_backup: bool,

    /// Delete backups older than this many days after backing up
    #[arg(long, value_name = "DAYS")]
    retention_days: Option<u32>,
}

impl UpdateCommand {
    /// Run the backup-then-update flow and print its log.
    ///
    /// Fails (exit status 1) when the update step did not write `user.js`.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let profile = ctx.profile_path(self.profile)?;
        let auto_backup = if self.no_backup || !ctx.settings.auto_backup {
            AutoBackup::Disabled
        } else {
            match ctx.backup_folder(self.backup_dir)? {
                Some(dest_root) => AutoBackup::Into {
                    dest_root,
                    retention_days: ctx.retention_days(self.retention_days),
                },
                None => AutoBackup::Unconfigured,
            }
        };

        let profile = profile.unwrap_or_default();
        let flow = ctx.updater()?.update_with_backup(&profile, auto_backup).await;

        if !ctx.emit_json(&flow)? {
            print_log(&flow.log);
        }

        if flow.ok {
            Ok(())
        } else if profile.as_os_str().is_empty() {
            Err(BfupError::ProfileNotSet.into())
        } else {
            Err(BfupError::Other {
                message: "Update failed".to_string(),
            }
            .into())
        }
    }
}
