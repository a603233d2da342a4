//! Object storage error types.

use thiserror::Error;

/// Errors that can occur while writing to object storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Storage answered with a non-success status.
    #[error("Storage rejected '{key}' with status {status}")]
    Status { key: String, status: u16 },

    /// The configured endpoint cannot carry object paths.
    #[error("Invalid storage endpoint: {endpoint}")]
    InvalidEndpoint { endpoint: String },

    /// A request could not be signed.
    #[error("Failed to sign storage request: {message}")]
    Signing { message: String },

    /// The store refused the object for another reason.
    #[error("Storage rejected '{key}': {message}")]
    Rejected { key: String, message: String },
}
