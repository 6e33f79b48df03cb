//! Configuration for the `bfup` command line.
//!
//! Settings live in a single TOML file:
//!
//! - **Unix/macOS**: `~/.bfup/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\bfup\config.toml`
//!
//! The `--config` flag or the `BFUP_CONFIG_PATH` environment variable points
//! elsewhere. A missing file means defaults.
//!
//! # Precedence
//!
//! 1. Command-line flags
//! 2. `config.toml`
//! 3. Built-in defaults (retention 60 days, auto-backup on, Betterfox `main`)
//!
//! Only the CLI reads this file. The library operations take every path and
//! retention window as an explicit argument.
//!
//! # Format
//!
//! ```toml
//! profile_path = "~/.mozilla/firefox/abcd1234.default-release"
//! backup_folder = "~/BetterfoxBackups"
//! auto_backup = true
//! retention_days = 60
//!
//! [remote]
//! raw_url = "https://raw.githubusercontent.com/yokoffing/Betterfox/main/user.js"
//! ```

mod settings;

pub use settings::{EXAMPLE, KEYS, RemoteSettings, Settings, write_private};
