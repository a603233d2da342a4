//! Configuration loading.
//!
//! This module handles parsing the migrator's `config.toml`: the target
//! repository, the attachment store and the user mapping table.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{
    GitHubSettings, StorageSettings, AWS_ACCESS_KEY_ID_ENV, AWS_REGION_ENV,
    AWS_SECRET_ACCESS_KEY_ENV, AWS_SESSION_TOKEN_ENV, DEFAULT_REGION, GITHUB_TOKEN_ENV,
};

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Parsed contents of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MigratorConfig {
    /// Target GitHub repository and identities.
    pub github: GitHubSettings,

    /// Attachment storage.
    pub storage: StorageSettings,

    /// Unfuddle user id to GitHub username.
    #[serde(default)]
    pub users: HashMap<String, String>,
}

impl MigratorConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, not valid
    /// TOML, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = Self::parse(&contents, path)?;
        debug!(
            repository = %format!("{}/{}", config.github.owner, config.github.repository),
            bucket = %config.storage.bucket,
            users = config.users.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses and validates configuration text. `path` is used for messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlError`] or [`ConfigError::ValidationError`].
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Validates field contents.
    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        for (name, value) in [
            ("github.owner", &self.github.owner),
            ("github.repository", &self.github.repository),
            ("github.default-issue-user", &self.github.default_issue_user),
            ("storage.bucket", &self.storage.bucket),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{name} must not be empty")));
            }
        }

        if self.github.owner.contains('/') || self.github.repository.contains('/') {
            return Err(invalid(
                "github.owner and github.repository must not contain '/'".to_string(),
            ));
        }

        if let Some(endpoint) = &self.storage.endpoint {
            if Url::parse(endpoint).is_err() {
                return Err(invalid(format!(
                    "storage.endpoint is not a valid URL: {endpoint}"
                )));
            }
        }

        if self.storage.access_key_id.is_some() != self.storage.secret_access_key.is_some() {
            return Err(invalid(
                "storage.access-key-id and storage.secret-access-key must be set together"
                    .to_string(),
            ));
        }

        if let Some(base) = &self.storage.public_base_url {
            if Url::parse(base).is_err() {
                return Err(invalid(format!(
                    "storage.public-base-url is not a valid URL: {base}"
                )));
            }
        }

        if let Some((id, _)) = self.users.iter().find(|(_, login)| login.trim().is_empty()) {
            return Err(invalid(format!("users.{id} must name a GitHub user")));
        }

        Ok(())
    }
}
