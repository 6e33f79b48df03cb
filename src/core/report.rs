//! Log lines carried by boundary results.
//!
//! Every boundary operation reports what happened as an ordered list of
//! human-readable lines, each starting with a bracketed marker. The CLI colors
//! lines by marker; JSON consumers can match on the prefix.

use std::fmt;

/// Severity prefix of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `[ok]`
    Ok,
    /// `[err]`
    Err,
    /// `[warn]`
    Warn,
    /// `[info]`
    Info,
}

impl Marker {
    /// The bracketed prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "[ok]",
            Self::Err => "[err]",
            Self::Warn => "[warn]",
            Self::Info => "[info]",
        }
    }

    /// Marker a line starts with, if any.
    #[must_use]
    pub fn of(line: &str) -> Option<Self> {
        [Self::Ok, Self::Err, Self::Warn, Self::Info]
            .into_iter()
            .find(|m| line.starts_with(m.as_str()))
    }

    /// Format `message` behind this marker.
    pub fn line(self, message: impl fmt::Display) -> String {
        format!("{} {message}", self.as_str())
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
