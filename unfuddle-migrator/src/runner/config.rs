//! Runner configuration.

use crate::pipeline::DEFAULT_CONCURRENCY;
use std::path::{Path, PathBuf};

/// Configuration for running a migration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the backup directory holding `backup.xml`.
    backup_path: PathBuf,
    /// Path to the migrator's `config.toml`.
    config_path: PathBuf,
    /// GitHub token overriding the configured one.
    token: Option<String>,
    /// Whether to preview the migration without remote writes.
    dry_run: bool,
    /// Maximum simultaneous uploads per attachment group.
    concurrency: usize,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(backup_path: PathBuf, dry_run: bool) -> Self {
        let config_path = PathBuf::from("config.toml");
        Self {
            backup_path,
            config_path,
            token: None,
            dry_run,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets a custom config file path.
    #[must_use]
    pub fn with_config_path(mut self, config_path: PathBuf) -> Self {
        self.config_path = config_path;
        self
    }

    /// Sets a GitHub token that wins over the environment and config file.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Sets the upload concurrency.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Returns the backup directory path.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Returns the config file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the GitHub token override.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the upload concurrency.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
