//! Backup reading error types.

use thiserror::Error;

/// Errors that can occur while reading a backup.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Failed to read the backup document.
    #[error("Failed to read backup '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backup document is not well-formed XML.
    #[error("Malformed backup XML in '{path}': {source}")]
    XmlError {
        path: String,
        #[source]
        source: super::xml::XmlParseError,
    },

    /// A structural element is missing.
    #[error("Backup is missing element <{element}>")]
    MissingElement { element: String },

    /// A required field on an entity is missing.
    #[error("{entity} '{id}' is missing required field <{field}>")]
    MissingField {
        entity: &'static str,
        id: String,
        field: &'static str,
    },

    /// A field holds a value that cannot be interpreted.
    #[error("{entity} '{id}' has invalid <{field}> value '{value}'")]
    InvalidValue {
        entity: &'static str,
        id: String,
        field: &'static str,
        value: String,
    },
}
