//! Compare the installed `user.js` with upstream.
//!
//! ```bash
//! bfup check                             # configured profile, if any
//! bfup check --profile ~/.mozilla/firefox/abcd.default-release
//! bfup check --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::CommandContext;
use crate::updater::VersionStatus;

/// Show local and remote `user.js` versions.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Profile directory; falls back to `profile_path` from the config
    #[arg(short, long, value_name = "DIR")]
    profile: Option<PathBuf>,
}

impl CheckCommand {
    /// Run the check. Never fails on network errors; those show as `n/d`.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let profile = ctx.profile_path(self.profile)?;
        let status = ctx.updater()?.check_versions(profile.as_deref()).await;

        if !ctx.emit_json(&status)? {
            print_status(&status);
        }
        Ok(())
    }
}

fn print_status(status: &VersionStatus) {
    println!("{:<9}{}", "Local:", status.local);
    println!("{:<9}{}", "Remote:", status.remote);
    println!("{:<9}{}", "GitHub:", status.github);
    println!("{:<9}{}", "Firefox:", status.firefox);

    let verdict = if !status.remote.is_determined() {
        "remote version unavailable".yellow()
    } else if status.update_available {
        "update available".yellow().bold()
    } else {
        "up to date".green()
    };
    println!("{:<9}{}", "Status:", verdict);
}
