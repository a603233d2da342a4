//! Issue tracker error types.

use thiserror::Error;

/// Errors that can occur during issue tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The tracker refused the request.
    #[error("{operation} rejected: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
}
