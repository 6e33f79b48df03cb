//! Version extraction and comparison for `user.js` content.
//!
//! Betterfox stamps every `user.js` with a header comment such as
//! `// Betterfox user.js v130.0`. This module pulls that version out of free-form
//! text and decides whether a remote version supersedes a local one.
//!
//! Parsing never fails: text without a recognizable version yields
//! [`VersionString::NotDetermined`], rendered as the `"n/d"` sentinel.
//!
//! # Precedence
//!
//! 1. Product marker: `Betterfox`, optionally followed by ` user.js`, an
//!    optional `v`, then dotted digits (case-insensitive)
//! 2. Generic fallback: `version:` or `version=`, optional whitespace, dotted digits
//!
//! Only the first match of the winning pattern is used.
//!
//! # Examples
//!
//! ```rust
//! use bfup_cli::version::{VersionString, parse_version};
//!
//! assert_eq!(parse_version("// Betterfox user.js v130.0\n").to_string(), "v130.0");
//! assert_eq!(parse_version("version = 2.1").to_string(), "v2.1");
//! assert_eq!(parse_version("nothing here"), VersionString::NotDetermined);
//! ```

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use crate::constants::NOT_DETERMINED;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Betterfox(?: user\.js)? v?(\d+(?:\.\d+)*)").expect("marker pattern is valid")
});

static FALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)version[:=]\s*(\d+(?:\.\d+)*)").expect("fallback pattern is valid")
});

/// A fully parsed version (`v<digits>(.<digits>)*`) or the "not determined" sentinel.
///
/// There is no partial state: construction goes through [`parse_version`] or
/// [`VersionString::from_digits`], both of which either produce a complete
/// version or the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VersionString {
    /// Dotted numeric version, stored without the leading `v`.
    Known(String),
    /// No version could be extracted; displayed as `"n/d"`.
    #[default]
    NotDetermined,
}

impl VersionString {
    /// Build from a dotted-digit capture such as `"130.0"`.
    ///
    /// Returns the sentinel for anything that is not `<digits>(.<digits>)*`.
    #[must_use]
    pub fn from_digits(digits: &str) -> Self {
        let well_formed = !digits.is_empty()
            && digits.split('.').all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
        if well_formed {
            Self::Known(digits.to_string())
        } else {
            Self::NotDetermined
        }
    }

    /// Whether a real version was extracted.
    #[must_use]
    pub const fn is_determined(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Numeric components, e.g. `[130, 0]` for `v130.0`.
    fn components(&self) -> Option<Vec<u64>> {
        match self {
            Self::Known(digits) => digits.split('.').map(|part| part.parse().ok()).collect(),
            Self::NotDetermined => None,
        }
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(digits) => write!(f, "v{digits}"),
            Self::NotDetermined => f.write_str(NOT_DETERMINED),
        }
    }
}

impl Serialize for VersionString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw.strip_prefix('v').unwrap_or(&raw);
        Ok(Self::from_digits(digits))
    }
}

/// Extract the version token from `user.js`-style content.
///
/// See the [module documentation](self) for the matching rules.
#[must_use]
pub fn parse_version(content: &str) -> VersionString {
    MARKER_RE
        .captures(content)
        .or_else(|| FALLBACK_RE.captures(content))
        .and_then(|caps| caps.get(1))
        .map_or(VersionString::NotDetermined, |m| VersionString::from_digits(m.as_str()))
}

/// Compare two versions component by component; missing components count as 0.
///
/// Returns `None` when either side is undetermined or does not parse as numbers.
#[must_use]
pub fn compare(a: &VersionString, b: &VersionString) -> Option<Ordering> {
    let left = a.components()?;
    let right = b.components()?;
    let len = left.len().max(right.len());
    let pad = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);
    Some((0..len).map(|i| pad(&left, i).cmp(&pad(&right, i))).find(|o| o.is_ne()).unwrap_or(Ordering::Equal))
}

/// Decide whether the remote version should replace the local one.
///
/// - remote undetermined: never (nothing trustworthy to install)
/// - local undetermined: always
/// - otherwise remote must be strictly newer; incomparable versions count as newer
#[must_use]
pub fn needs_update(local: &VersionString, remote: &VersionString) -> bool {
    if !remote.is_determined() {
        return false;
    }
    if !local.is_determined() {
        return true;
    }
    compare(remote, local).is_none_or(Ordering::is_gt)
}
