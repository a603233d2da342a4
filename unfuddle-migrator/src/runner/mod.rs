//! Wires configuration, backup and remote clients into a migration run.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::backup::Backup;
use crate::config::{ConfigError, MigratorConfig};
use crate::lookup::IdentifierMap;
use crate::pipeline::{MigrationOptions, Migrator};
use crate::storage::HttpObjectStore;
use crate::summary::RunSummary;
use crate::tracker::GitHubTracker;
use octocrab::Octocrab;
use tracing::{info, warn};
use url::Url;

/// Orchestrates a full backup-to-GitHub migration run.
pub struct Runner {
    config: RunnerConfig,
    settings: MigratorConfig,
    tracker: GitHubTracker,
    store: HttpObjectStore,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the config file is invalid, a live run has
    /// no GitHub token or writes to S3 without storage credentials, or a
    /// remote client cannot be constructed.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let settings = MigratorConfig::load(config.config_path())?;

        let endpoint = settings.storage.resolve_endpoint();
        let endpoint = Url::parse(&endpoint).map_err(|e| ConfigError::ValidationError {
            path: config.config_path().display().to_string(),
            message: format!("storage endpoint '{endpoint}' is not a valid URL: {e}"),
        })?;
        let signer = settings.storage.signer();
        if signer.is_none() && !config.dry_run() {
            if settings.storage.requires_signing() {
                return Err(ConfigError::ValidationError {
                    path: config.config_path().display().to_string(),
                    message: "storage credentials are required to write to S3".to_string(),
                }
                .into());
            }
            warn!(
                endpoint = %endpoint,
                "No storage credentials configured; uploads will be sent unsigned"
            );
        }

        let token = config
            .token()
            .map(str::to_string)
            .or_else(|| settings.github.resolve_token());
        let mut builder = Octocrab::builder();
        match token {
            Some(token) => builder = builder.personal_token(token),
            None if config.dry_run() => warn!("No GitHub token configured; dry run only"),
            None => {
                return Err(ConfigError::ValidationError {
                    path: config.config_path().display().to_string(),
                    message: "a GitHub token is required for a live run".to_string(),
                }
                .into())
            }
        }
        let tracker = GitHubTracker::new(
            builder.build()?,
            settings.github.owner.clone(),
            settings.github.repository.clone(),
        );

        let store = HttpObjectStore::new(reqwest::Client::builder().build()?, endpoint, signer)?;

        Ok(Self {
            config,
            settings,
            tracker,
            store,
        })
    }

    /// Executes the full migration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the backup cannot be read or any migration
    /// step fails.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let backup = Backup::load(self.config.backup_path())?;

        info!(
            repository = %self.tracker.full_name(),
            dry_run = self.config.dry_run(),
            "Starting migration"
        );

        let options = MigrationOptions::new(
            self.settings.storage.layout(),
            self.settings.github.default_issue_user.clone(),
            backup.attachments_dir(),
        )
        .with_dry_run(self.config.dry_run())
        .with_concurrency(self.config.concurrency());

        let mut ids = IdentifierMap::new(self.settings.users.clone());
        let migrator = Migrator::new(&self.tracker, &self.store, &options);
        let summary = migrator.run(&backup.project, &mut ids).await?;
        Ok(summary)
    }
}
