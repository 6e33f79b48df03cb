//! Global constants used throughout the BFUP codebase.
//!
//! Upstream locations, on-disk naming conventions and the defaults the
//! command-line layer falls back to when neither a flag nor the config file
//! provides a value.

/// Raw `user.js` published on the Betterfox `main` branch.
pub const USERJS_URL: &str = "https://raw.githubusercontent.com/yokoffing/Betterfox/main/user.js";

/// GitHub commits API, narrowed to the single most recent commit touching `user.js`.
pub const COMMITS_URL: &str =
    "https://api.github.com/repos/yokoffing/Betterfox/commits?path=user.js&per_page=1";

/// Project page, shown in help output.
pub const PROJECT_URL: &str = "https://github.com/yokoffing/Betterfox";

/// Value sent in the `User-Agent` header of every upstream request.
pub const USER_AGENT: &str = "Betterfox-Updater";

/// Value sent in the `Accept` header; upstream answers with text or JSON.
pub const ACCEPT: &str = "text/plain,application/json;q=0.9";

/// Name of the override file inside a profile directory.
pub const USER_JS: &str = "user.js";

/// Name of the profile registry inside the browser's base directory.
pub const PROFILES_INI: &str = "profiles.ini";

/// Prefix shared by every backup directory under a backup root.
///
/// Retention sweeps identify backups by this prefix alone.
pub const BACKUP_PREFIX: &str = "backup-";

/// "Not determined" sentinel used in place of a missing version or timestamp.
pub const NOT_DETERMINED: &str = "n/d";

/// Retention window applied by the CLI when none is configured.
pub const DEFAULT_RETENTION_DAYS: u32 = 60;

/// Seconds in one retention day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;
