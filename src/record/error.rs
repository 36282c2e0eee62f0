//! Record error types
//!
//! Errors raised while constructing records or querying them by attribute.

use thiserror::Error;

/// Errors that can occur in the record layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Year was absent, non-numeric, or outside the calendar range
    #[error("Invalid date: year {0:?} is not a usable integer")]
    InvalidDate(Option<String>),

    /// State was absent or blank
    #[error("Missing state")]
    MissingState,

    /// Attribute name does not name a record field
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
}

/// Result type alias for record operations
pub type RecordResult<T> = Result<T, RecordError>;
