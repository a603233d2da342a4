//! Migration options.

use crate::storage::StorageLayout;
use std::path::{Path, PathBuf};

/// Default number of simultaneous uploads within one attachment group.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Settings that shape one migration run.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Object key and public URL layout for attachments.
    layout: StorageLayout,
    /// GitHub user credited for comments with unmapped authors.
    default_issue_user: String,
    /// Directory holding the raw attachment files.
    attachments_dir: PathBuf,
    /// Whether remote writes are suppressed.
    dry_run: bool,
    /// Maximum simultaneous uploads per attachment group.
    concurrency: usize,
}

impl MigrationOptions {
    /// Creates options for a live run.
    pub fn new(
        layout: StorageLayout,
        default_issue_user: impl Into<String>,
        attachments_dir: PathBuf,
    ) -> Self {
        Self {
            layout,
            default_issue_user: default_issue_user.into(),
            attachments_dir,
            dry_run: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the upload concurrency; values below one are raised to one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns the storage layout.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Returns the fallback comment author.
    pub fn default_issue_user(&self) -> &str {
        &self.default_issue_user
    }

    /// Returns the attachment directory.
    pub fn attachments_dir(&self) -> &Path {
        &self.attachments_dir
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
