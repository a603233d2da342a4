#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod attachments;
pub mod backup;
pub mod comments;
pub mod config;
pub mod content_type;
pub mod issues;
pub mod lookup;
pub mod milestones;
pub mod pipeline;
pub mod runner;
pub mod storage;
pub mod summary;
pub mod tracker;

pub use attachments::{relocate_attachment, relocate_attachments};
pub use backup::{
    Backup, BackupError, SourceAttachment, SourceComment, SourceComponent, SourceFieldValue,
    SourceMilestone, SourceProject, SourceTicket, TicketStatus,
};
pub use comments::{compose_comment_body, migrate_comments, resolve_author};
pub use config::{ConfigError, GitHubSettings, MigratorConfig, StorageSettings};
pub use content_type::{content_type_for, DEFAULT_CONTENT_TYPE};
pub use issues::{compose_issue, IssueDraft, RemoteIssue, TicketState, RESOLUTION_HEADING};
pub use lookup::IdentifierMap;
pub use milestones::migrate_milestones;
pub use pipeline::{
    MappingError, MigrationContext, MigrationError, MigrationOptions, Migrator, Phase, Progress,
};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use storage::{HttpObjectStore, ObjectStore, StorageError, StorageLayout};
pub use summary::RunSummary;
pub use tracker::{
    GitHubTracker, IssueState, IssueTracker, MilestoneState, NewMilestone, RemoteMilestone,
    TrackerError,
};
