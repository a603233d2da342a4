//! Runner error types.

/// Errors that can occur while running the migrator.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Backup reading errors.
    #[error(transparent)]
    Backup(#[from] crate::backup::BackupError),

    /// Migration pipeline errors.
    #[error(transparent)]
    Migration(#[from] crate::pipeline::MigrationError),

    /// Object store initialization errors.
    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// HTTP client initialization errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
