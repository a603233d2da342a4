//! Unfuddle backup reading.
//!
//! A backup is a directory holding `backup.xml` and the raw attachment files
//! under `media/attachments/<attachment-id>`.

mod error;
mod model;
pub mod xml;

pub use error::BackupError;
pub use model::{
    SourceAttachment, SourceComment, SourceComponent, SourceFieldValue, SourceMilestone,
    SourceProject, SourceTicket, TicketStatus,
};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the XML document inside a backup directory.
pub const BACKUP_FILE: &str = "backup.xml";

/// Attachment directory relative to the backup directory.
pub const ATTACHMENTS_DIR: &str = "media/attachments";

/// A parsed backup together with its location on disk.
#[derive(Debug, Clone)]
pub struct Backup {
    /// Directory the backup was loaded from.
    pub root: PathBuf,
    /// The migrated project.
    pub project: SourceProject,
}

impl Backup {
    /// Loads and parses the backup stored in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] if `backup.xml` cannot be read, is not
    /// well-formed, lacks the `account > projects > project` path, or holds
    /// malformed entities.
    pub fn load(dir: &Path) -> Result<Self, BackupError> {
        let path = dir.join(BACKUP_FILE);
        info!(path = %path.display(), "Reading backup");

        let contents = std::fs::read_to_string(&path).map_err(|e| BackupError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let project = Self::parse(&contents).map_err(|e| match e {
            BackupError::XmlError { source, .. } => BackupError::XmlError {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;

        info!(
            components = project.components.len(),
            field_values = project.field_values.len(),
            milestones = project.milestones.len(),
            tickets = project.tickets.len(),
            "Backup read"
        );

        Ok(Self {
            root: dir.to_path_buf(),
            project,
        })
    }

    /// Parses backup XML text into the project it contains.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] on malformed XML or entities.
    pub fn parse(contents: &str) -> Result<SourceProject, BackupError> {
        let root = xml::parse_document(contents).map_err(|source| BackupError::XmlError {
            path: "<memory>".to_string(),
            source,
        })?;

        let project = if root.name == "project" {
            &root
        } else {
            root.child("projects")
                .ok_or_else(|| BackupError::MissingElement {
                    element: "projects".to_string(),
                })?
                .child("project")
                .ok_or_else(|| BackupError::MissingElement {
                    element: "project".to_string(),
                })?
        };

        debug!(
            title = project.field("title").unwrap_or_default(),
            "Found project"
        );
        SourceProject::from_node(project)
    }

    /// Directory holding the raw attachment files.
    #[must_use]
    pub fn attachments_dir(&self) -> PathBuf {
        self.root.join(ATTACHMENTS_DIR)
    }
}
