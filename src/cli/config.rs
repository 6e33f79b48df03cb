//! Manage the bfup settings file.
//!
//! ```bash
//! bfup config                                  # same as `config show`
//! bfup config init                             # write a commented example
//! bfup config set backup_folder ~/fx-backups
//! bfup config set retention_days 30
//! bfup config path
//! ```
//!
//! Valid keys for `set`: `profile_path`, `backup_folder`, `auto_backup`,
//! `retention_days`, `profiles_dir`, `remote.raw_url`, `remote.commits_url`.
//! An empty value clears a key.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use super::common::CommandContext;
use crate::config::{EXAMPLE, Settings, write_private};

/// Inspect or change `config.toml`.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Print the effective settings
    Show,

    /// Print the location of the settings file
    Path,

    /// Change one setting and save the file
    Set {
        /// Setting name, e.g. `backup_folder` or `remote.raw_url`
        key: String,
        /// New value; empty to clear
        value: String,
    },

    /// Write a commented example settings file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    /// Whether the subcommand reads the current settings. `init` and `path`
    /// must keep working when the file is broken.
    #[must_use]
    pub const fn needs_settings(&self) -> bool {
        !matches!(self.command, Some(ConfigSubcommands::Path | ConfigSubcommands::Init { .. }))
    }

    /// Run the selected subcommand; `show` when none is given.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Show) | None => Self::show(ctx),
            Some(ConfigSubcommands::Path) => Self::show_path(ctx),
            Some(ConfigSubcommands::Set {
                key,
                value,
            }) => Self::set(ctx, &key, &value).await,
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(&ctx.config_path, force).await,
        }
    }

    fn show(ctx: &CommandContext) -> Result<()> {
        if ctx.emit_json(&ctx.settings)? {
            return Ok(());
        }

        let endpoints = ctx.settings.endpoints();
        let show = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| "(not set)".dimmed().to_string())
        };

        println!("{}", "bfup settings".bold());
        println!("Location: {}\n", ctx.config_path.display());
        println!("profile_path       = {}", show(&ctx.settings.profile_path));
        println!("backup_folder      = {}", show(&ctx.settings.backup_folder));
        println!("auto_backup        = {}", ctx.settings.auto_backup);
        println!("retention_days     = {}", ctx.settings.retention_days);
        println!("profiles_dir       = {}", show(&ctx.settings.profiles_dir));
        println!("remote.raw_url     = {}", endpoints.raw_url);
        println!("remote.commits_url = {}", endpoints.commits_url);
        Ok(())
    }

    fn show_path(ctx: &CommandContext) -> Result<()> {
        println!("{}", ctx.config_path.display());
        Ok(())
    }

    async fn set(ctx: &CommandContext, key: &str, value: &str) -> Result<()> {
        let mut settings = ctx.settings.clone();
        settings.set(key, value)?;
        settings.save_to(&ctx.config_path).await?;

        if value.is_empty() {
            println!("{} {key} cleared", "[ok]".green());
        } else {
            println!("{} {key} = {value}", "[ok]".green());
        }
        Ok(())
    }

    async fn init(config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            println!("{} Config already exists at: {}", "[warn]".yellow(), config_path.display());
            println!("       Use --force to overwrite");
            return Ok(());
        }

        write_private(config_path, EXAMPLE).await?;
        // The example must stay loadable
        Settings::load_from(config_path)
            .await
            .with_context(|| format!("Example config at {} is invalid", config_path.display()))?;

        println!("{} Created config at: {}", "[ok]".green(), config_path.display());
        Ok(())
    }
}
