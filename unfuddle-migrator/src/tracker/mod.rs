//! Remote issue tracker capability.
//!
//! The migration pipeline only talks to the destination through
//! [`IssueTracker`]; [`GitHubTracker`] is the production implementation.

mod error;
mod github;

pub use error::TrackerError;
pub use github::GitHubTracker;

use crate::issues::IssueDraft;
use async_trait::async_trait;

/// Milestone state, used both for filtering and creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneState {
    Open,
    Closed,
    /// Listing filter matching every milestone.
    All,
}

impl MilestoneState {
    /// Returns the REST API spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Issue state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
}

/// A milestone that already exists on the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMilestone {
    /// Remote milestone number.
    pub number: u64,
    /// Milestone title.
    pub title: String,
}

/// A milestone to create on the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMilestone {
    pub title: String,
    pub state: MilestoneState,
    pub description: String,
}

/// Write and lookup operations the migration needs from an issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists milestones in the given state.
    async fn list_milestones(
        &self,
        state: MilestoneState,
        per_page: u8,
    ) -> Result<Vec<RemoteMilestone>, TrackerError>;

    /// Deletes a milestone by number.
    async fn delete_milestone(&self, number: u64) -> Result<(), TrackerError>;

    /// Creates a milestone, returning its remote number.
    async fn create_milestone(&self, milestone: &NewMilestone) -> Result<u64, TrackerError>;

    /// Creates an issue, returning its remote number.
    async fn create_issue(&self, issue: &IssueDraft) -> Result<u64, TrackerError>;

    /// Changes the state of an issue.
    async fn edit_issue(&self, number: u64, state: IssueState) -> Result<(), TrackerError>;

    /// Adds a comment to an issue on behalf of `user`.
    async fn create_comment(&self, number: u64, body: &str, user: &str)
        -> Result<(), TrackerError>;
}
