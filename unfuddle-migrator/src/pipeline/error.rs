//! Migration pipeline error types.

use crate::issues::TicketState;
use crate::storage::StorageError;
use crate::tracker::TrackerError;
use thiserror::Error;

/// A source id that should have been mapped by an earlier phase was not.
#[derive(Debug, Error)]
pub enum MappingError {
    /// No entry for the id in the relevant table.
    #[error("No remote {kind} is mapped for source id '{id}'")]
    Unresolved { kind: &'static str, id: String },
}

/// Errors that abort a migration run.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A local attachment could not be read.
    #[error("Failed to read attachment '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An attachment could not be written to object storage.
    #[error("Failed to upload '{key}': {source}")]
    Upload {
        key: String,
        #[source]
        source: StorageError,
    },

    /// An issue tracker call failed.
    #[error("Issue tracker call {operation} failed: {source}")]
    RemoteApi {
        operation: &'static str,
        #[source]
        source: TrackerError,
    },

    /// A lookup ran before the phase that fills it.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// A ticket tried to skip a required step.
    #[error("Ticket '{ticket}' cannot move from {from} to {to}")]
    InvalidTransition {
        ticket: String,
        from: TicketState,
        to: TicketState,
    },
}

impl MigrationError {
    /// Wraps a tracker failure for the named operation.
    pub(crate) fn remote(operation: &'static str) -> impl FnOnce(TrackerError) -> Self {
        move |source| Self::RemoteApi { operation, source }
    }
}
