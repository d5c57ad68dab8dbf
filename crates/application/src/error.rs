//! Application error types

use importer_domain::DomainError;
use thiserror::Error;

/// Application-level errors.
///
/// Everything except `Domain` ends the run; malformed references are
/// reported as `Domain` and skipped by the caller.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Process configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The env0 API answered with a non-success status or could not be reached.
    #[error("env0 API call to {path} failed: {status}")]
    Api {
        /// Request path.
        path: String,
        /// Status line or transport error.
        status: String,
    },

    /// An env0 API response did not have the expected shape.
    #[error("failed to decode response from {path}: {message}")]
    Decode {
        /// Request path.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// A reference could not be resolved to an environment.
    #[error("resolution error: {0}")]
    Resolution(String),

    /// Reading inputs or writing outputs failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
