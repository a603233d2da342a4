//! Configuration sections.

use crate::storage::{AwsCredentials, SigV4Signer, StorageLayout, DEFAULT_KEY_PREFIX};
use serde::Deserialize;

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

pub const AWS_ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";
pub const AWS_REGION_ENV: &str = "AWS_REGION";

/// Region used when neither the file nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// `[github]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubSettings {
    /// Account used for authentication; also owns the target repository.
    pub owner: String,

    /// Target repository name.
    pub repository: String,

    /// User credited for comments whose author has no GitHub mapping.
    pub default_issue_user: String,

    /// Personal access token (optional, falls back to `GITHUB_TOKEN`).
    pub token: Option<String>,
}

impl GitHubSettings {
    /// Resolves the token. The environment takes precedence over the file.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        env_value(GITHUB_TOKEN_ENV).or_else(|| self.token.clone())
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageSettings {
    /// Bucket receiving attachments.
    pub bucket: String,

    /// Region used for signing and for the default endpoint (falls back to
    /// `AWS_REGION`, then "us-east-1").
    pub region: Option<String>,

    /// Base URL that objects are `PUT` to (defaults to the regional S3 host).
    pub endpoint: Option<String>,

    /// Base URL for public links (defaults to the bucket's S3 host).
    pub public_base_url: Option<String>,

    /// Prefix prepended to attachment keys (defaults to "unfuddle_imports").
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Access key id (optional, falls back to `AWS_ACCESS_KEY_ID`).
    pub access_key_id: Option<String>,

    /// Secret access key (optional, falls back to `AWS_SECRET_ACCESS_KEY`).
    pub secret_access_key: Option<String>,

    /// Session token for temporary credentials (optional, falls back to
    /// `AWS_SESSION_TOKEN`).
    pub session_token: Option<String>,
}

impl StorageSettings {
    /// Resolves the signing region. The environment takes precedence over the file.
    #[must_use]
    pub fn resolve_region(&self) -> String {
        env_value(AWS_REGION_ENV)
            .or_else(|| self.region.clone())
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    /// Resolves the endpoint objects are written to.
    #[must_use]
    pub fn resolve_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", self.resolve_region()))
    }

    /// Resolves signing credentials. The environment takes precedence over
    /// the file. Returns `None` unless both the key id and the secret are set.
    #[must_use]
    pub fn resolve_credentials(&self) -> Option<AwsCredentials> {
        let access_key_id =
            env_value(AWS_ACCESS_KEY_ID_ENV).or_else(|| self.access_key_id.clone())?;
        let secret_access_key =
            env_value(AWS_SECRET_ACCESS_KEY_ENV).or_else(|| self.secret_access_key.clone())?;
        Some(AwsCredentials {
            access_key_id,
            secret_access_key,
            session_token: env_value(AWS_SESSION_TOKEN_ENV).or_else(|| self.session_token.clone()),
        })
    }

    /// Returns true if the endpoint is AWS S3, which rejects unsigned writes.
    #[must_use]
    pub fn requires_signing(&self) -> bool {
        url::Url::parse(&self.resolve_endpoint())
            .ok()
            .and_then(|url| url.host_str().map(|host| host.ends_with(".amazonaws.com")))
            .unwrap_or(false)
    }

    /// Builds the request signer, if credentials are available.
    #[must_use]
    pub fn signer(&self) -> Option<SigV4Signer> {
        self.resolve_credentials()
            .map(|credentials| SigV4Signer::new(credentials, self.resolve_region()))
    }

    /// Builds the attachment key layout.
    #[must_use]
    pub fn layout(&self) -> StorageLayout {
        StorageLayout::new(
            self.bucket.clone(),
            self.key_prefix.clone(),
            self.public_base_url.clone(),
        )
    }
}

pub(crate) fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

/// Reads a non-empty environment variable.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
