//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while interpreting variable references.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An input value looked like a reference but could not be parsed.
    #[error("invalid reference for '{key}': {reason}")]
    InvalidReference {
        /// The input key carrying the malformed reference.
        key: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A JSON-encoded import produced a string that is not valid JSON.
    #[error("output value is not valid JSON: {0}")]
    InvalidJsonOutput(String),
}

impl DomainError {
    /// Creates an `InvalidReference` error for the given key.
    #[must_use]
    pub fn invalid_reference(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
