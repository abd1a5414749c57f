#![forbid(unsafe_code)]

//! Errors surfaced by the pivot.
//!
//! Only structural misuse and bad configuration are errors. Out-of-range
//! selection, notifications that arrive while a replacement is staged, and
//! calls after dispose are silent no-ops.

use thiserror::Error;

/// Result alias for pivot operations.
pub type Result<T> = std::result::Result<T, PivotError>;

/// Fatal configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PivotError {
    /// A controller is already bound to this host element.
    #[error("host element {host} is already bound to a pivot")]
    AlreadyBound { host: u64 },

    /// The item reference already occupies a panel.
    #[error("item at index {index} is already present in the pivot")]
    DuplicateItem { index: usize },

    /// Configuration failed to parse or validate.
    #[error("invalid pivot configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PivotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
