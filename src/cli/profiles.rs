//! List Firefox profiles from `profiles.ini`.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::CommandContext;

/// List the profiles registered with Firefox.
#[derive(Args, Debug)]
pub struct ProfilesCommand {}

impl ProfilesCommand {
    /// Print one profile per line, or a hint when none were found.
    pub fn execute(self, ctx: &CommandContext) -> Result<()> {
        let locator = ctx.locator()?;
        let profiles = locator.list_profiles();

        if ctx.emit_json(&profiles)? {
            return Ok(());
        }

        if profiles.is_empty() {
            println!("No Firefox profiles found in {}", locator.registry_path().display());
            return Ok(());
        }

        let width = profiles.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for profile in &profiles {
            println!("{}  {}", format!("{:<width$}", profile.name).bold(), profile.path.display());
        }
        Ok(())
    }
}
