//! Command-line interface for `bfup`.
//!
//! # Commands
//!
//! - `check` - Compare the profile's `user.js` version with upstream
//! - `profiles` - List Firefox profiles from `profiles.ini`
//! - `update` - Back up (best effort) and install the upstream `user.js`
//! - `backup` - Copy a profile into a timestamped backup and prune old ones
//! - `config` - Show or edit `~/.bfup/config.toml`
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging on stderr
//! - `--quiet` / `-q` - No logging at all
//! - `--config <PATH>` - Alternative settings file (also `BFUP_CONFIG_PATH`)
//! - `--format text|json` - Human-readable or machine-readable results
//! - `--profiles-dir <DIR>` - Directory holding `profiles.ini`
//!
//! Without `--verbose` or `--quiet`, logging follows `RUST_LOG` and defaults
//! to warnings only. Results always go to stdout; logs always go to stderr.
//!
//! # Exit Status
//!
//! `0` on success, `1` when the command fails. `update` and `backup` fail when
//! their result reports `ok: false`, after printing the log.

mod backup;
mod check;
pub mod common;
mod config;
mod profiles;
mod update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::constants::PROJECT_URL;
pub use common::{CommandContext, OutputFormat};

/// Root command and global options.
#[derive(Parser, Debug)]
#[command(
    name = "bfup",
    about = "Betterfox updater - keep a Firefox profile's user.js in sync with upstream",
    version,
    after_help = format!("Betterfox: {PROJECT_URL}")
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file (default: ~/.bfup/config.toml)
    #[arg(long, global = true, env = "BFUP_CONFIG_PATH", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Directory containing profiles.ini (default: the platform's Firefox directory)
    #[arg(long, global = true, value_name = "DIR")]
    profiles_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare the installed user.js version with upstream
    Check(check::CheckCommand),

    /// List Firefox profiles
    Profiles(profiles::ProfilesCommand),

    /// Install the latest upstream user.js into a profile
    Update(update::UpdateCommand),

    /// Back up a profile and prune expired backups
    Backup(backup::BackupCommand),

    /// Manage bfup settings
    Config(config::ConfigCommand),
}

impl Cli {
    /// Initialise logging, load settings, and run the selected command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_filter());

        let ctx = match &self.command {
            Commands::Config(cmd) if !cmd.needs_settings() => {
                CommandContext::unloaded(self.config, self.format, self.profiles_dir)?
            }
            _ => CommandContext::load(self.config, self.format, self.profiles_dir).await?,
        };

        match self.command {
            Commands::Check(cmd) => cmd.execute(&ctx).await,
            Commands::Profiles(cmd) => cmd.execute(&ctx),
            Commands::Update(cmd) => cmd.execute(&ctx).await,
            Commands::Backup(cmd) => cmd.execute(&ctx).await,
            Commands::Config(cmd) => cmd.execute(&ctx).await,
        }
    }

    /// Filter for the tracing subscriber; `None` disables logging.
    fn log_filter(&self) -> Option<EnvFilter> {
        if self.quiet {
            None
        } else if self.verbose {
            Some(EnvFilter::new("bfup_cli=debug,bfup=debug"))
        } else {
            Some(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        }
    }
}

fn init_logging(filter: Option<EnvFilter>) {
    let Some(filter) = filter else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
