//! Error handling for BFUP
//!
//! This module provides the strongly-typed error enum used inside the crate and
//! the user-friendly rendering used by the command-line front end. The error
//! system follows two rules:
//! 1. **Typed errors inside** - helpers return [`BfupError`] or `anyhow::Error`
//!    with context, so callers can match on failure modes where it matters
//! 2. **Structured results outside** - the boundary operations
//!    ([`crate::updater::Updater::update`], [`crate::backup::BackupManager::backup`],
//!    [`crate::updater::Updater::check_versions`], [`crate::profile::ProfileLocator::list_profiles`])
//!    never return `Err`; they fold failures into `ok`/`log` fields or the `"n/d"` sentinel
//!
//! Only the CLI entry point turns an `anyhow::Error` into terminal output, via
//! [`user_friendly_error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use bfup_cli::core::{BfupError, ErrorContext, user_friendly_error};
//!
//! let ctx = user_friendly_error(anyhow::Error::from(BfupError::ProfileNotSet));
//! ctx.display(); // red "error:" line plus a green suggestion
//!
//! let manual = ErrorContext::new(BfupError::DownloadFailed)
//!     .with_details("raw.githubusercontent.com did not answer");
//! println!("{manual}");
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for BFUP operations
///
/// # Error Categories
///
/// ## Preconditions
/// - [`ProfileNotSet`](BfupError::ProfileNotSet) - no profile directory was given
/// - [`BackupTargetMissing`](BfupError::BackupTargetMissing) - profile or backup root missing
///
/// ## Transport
/// - [`DownloadFailed`](BfupError::DownloadFailed) - the remote snapshot came back empty
/// - [`HttpStatus`](BfupError::HttpStatus) - upstream answered with status >= 400
/// - [`Network`](BfupError::Network) - connection or body read failure
///
/// ## File System and Configuration
/// - [`FileSystem`](BfupError::FileSystem) - copy/write/delete failure with the affected path
/// - [`ConfigError`](BfupError::ConfigError) - invalid configuration key or value
/// - [`IoError`](BfupError::IoError), [`TomlError`](BfupError::TomlError) - converted std/toml errors
#[derive(Error, Debug)]
pub enum BfupError {
    /// No profile directory was supplied to an operation that needs one.
    #[error("Profile not set")]
    ProfileNotSet,

    /// Backups need both a profile directory and a backup root.
    #[error("Profile or backup folder missing")]
    BackupTargetMissing,

    /// The remote snapshot carried no content.
    #[error("Download failed")]
    DownloadFailed,

    /// Upstream answered with an error status.
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        /// Numeric HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The request never produced a usable response.
    #[error("Network error: {operation}")]
    Network {
        /// What was being attempted
        operation: String,
        /// Underlying transport message
        reason: String,
    },

    /// A filesystem operation failed on a specific path.
    #[error("File system error: {operation} ({path})")]
    FileSystem {
        /// What was being attempted
        operation: String,
        /// Path the operation touched
        path: String,
    },

    /// Invalid configuration key or value.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// IO error from [`std::io::Error`]
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error from [`toml::de::Error`]
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Anything else, already formatted for the user
    #[error("{message}")]
    Other {
        /// Message shown to the user
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: the main error message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: an actionable next step in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying BFUP error
    pub error: BfupError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: BfupError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`BfupError`] variants, [`std::io::Error`] kinds and TOML syntax
/// errors; anything else is rendered with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(bfup_error) = error.downcast_ref::<BfupError>() {
        if let Some(ctx) = create_error_context(bfup_error) {
            return ctx;
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(BfupError::FileSystem {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion(
                    "Close Firefox and check that you own the profile and backup directories",
                )
                .with_details(io_error.to_string());
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(BfupError::FileSystem {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the profile directory exists; `bfup profiles` lists them")
                .with_details(io_error.to_string());
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(BfupError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Fix the TOML syntax in the config file or recreate it with `bfup config init --force`");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(BfupError::Other {
        message,
    })
}

/// Tailored suggestions for the variants a user can act on.
///
/// Returns `None` for variants that do not carry cloneable data; those fall
/// through to the generic rendering in [`user_friendly_error`].
fn create_error_context(error: &BfupError) -> Option<ErrorContext> {
    let ctx = match error {
        BfupError::ProfileNotSet => ErrorContext::new(BfupError::ProfileNotSet).with_suggestion(
            "Pass --profile <DIR>, or save one with `bfup config set profile_path <DIR>`",
        ),
        BfupError::BackupTargetMissing => ErrorContext::new(BfupError::BackupTargetMissing)
            .with_suggestion(
                "Pass --profile and --dest, or configure profile_path and backup_folder",
            ),
        BfupError::DownloadFailed => ErrorContext::new(BfupError::DownloadFailed)
            .with_suggestion("Check your network connection and retry")
            .with_details("Both the raw user.js and the commit metadata must be reachable"),
        BfupError::HttpStatus {
            status,
            url,
        } => ErrorContext::new(BfupError::HttpStatus {
            status: *status,
            url: url.clone(),
        })
        .with_suggestion("GitHub may be rate limiting unauthenticated requests; retry later"),
        BfupError::Network {
            operation,
            reason,
        } => ErrorContext::new(BfupError::Network {
            operation: operation.clone(),
            reason: reason.clone(),
        })
        .with_details(reason.clone()),
        BfupError::FileSystem {
            operation,
            path,
        } => ErrorContext::new(BfupError::FileSystem {
            operation: operation.clone(),
            path: path.clone(),
        })
        .with_suggestion("Check permissions on the path and that Firefox is not locking it"),
        BfupError::ConfigError {
            message,
        } => ErrorContext::new(BfupError::ConfigError {
            message: message.clone(),
        })
        .with_suggestion("Run `bfup config show` to inspect the current settings"),
        BfupError::Other {
            message,
        } => ErrorContext::new(BfupError::Other {
            message: message.clone(),
        }),
        BfupError::IoError(_) | BfupError::TomlError(_) => return None,
    };
    Some(ctx)
}
