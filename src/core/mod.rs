//! Core types shared across BFUP: the error enum, its user-facing rendering,
//! and the log-line markers used in boundary results.

pub mod error;
pub mod report;

pub use error::{BfupError, ErrorContext, user_friendly_error};
pub use report::Marker;
