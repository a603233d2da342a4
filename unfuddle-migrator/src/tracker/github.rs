//! GitHub implementation of [`IssueTracker`] backed by octocrab.

use super::{IssueState, IssueTracker, MilestoneState, NewMilestone, RemoteMilestone, TrackerError};
use crate::issues::IssueDraft;
use async_trait::async_trait;
use octocrab::{models, Octocrab};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Issue tracker writing into a single GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubTracker {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

#[derive(Debug, Serialize)]
struct ListMilestonesParams {
    state: &'static str,
    per_page: u8,
    page: u32,
}

#[derive(Debug, Serialize)]
struct CreateMilestoneRequest<'a> {
    title: &'a str,
    state: &'static str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
struct MilestoneResponse {
    number: u64,
    title: String,
}

impl GitHubTracker {
    /// Creates a tracker for `owner/repo`.
    pub fn new(octocrab: Octocrab, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            octocrab,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Returns the repository in `owner/repo` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn milestones_route(&self) -> String {
        format!("/repos/{}/{}/milestones", self.owner, self.repo)
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn list_milestones(
        &self,
        state: MilestoneState,
        per_page: u8,
    ) -> Result<Vec<RemoteMilestone>, TrackerError> {
        let route = self.milestones_route();
        let per_page = per_page.max(1);
        let mut milestones = Vec::new();
        let mut page = 1;

        loop {
            let params = ListMilestonesParams {
                state: state.as_str(),
                per_page,
                page,
            };
            let batch: Vec<MilestoneResponse> = self.octocrab.get(&route, Some(&params)).await?;
            let fetched = batch.len();
            debug!(page, fetched, "Fetched milestone page");

            milestones.extend(batch.into_iter().map(|m| RemoteMilestone {
                number: m.number,
                title: m.title,
            }));

            if !is_full_page(fetched, per_page) {
                break;
            }
            page += 1;
        }

        Ok(milestones)
    }

    async fn delete_milestone(&self, number: u64) -> Result<(), TrackerError> {
        let route = format!("{}/{number}", self.milestones_route());
        let response = self.octocrab._delete(route, None::<&()>).await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }

    async fn create_milestone(&self, milestone: &NewMilestone) -> Result<u64, TrackerError> {
        let request = CreateMilestoneRequest {
            title: &milestone.title,
            state: milestone.state.as_str(),
            description: &milestone.description,
        };
        let created: MilestoneResponse = self
            .octocrab
            .post(self.milestones_route(), Some(&request))
            .await?;
        Ok(created.number)
    }

    async fn create_issue(&self, issue: &IssueDraft) -> Result<u64, TrackerError> {
        let handler = self.octocrab.issues(&self.owner, &self.repo);
        let mut builder = handler
            .create(&issue.title)
            .body(&issue.body)
            .labels(issue.labels.clone());
        if let Some(assignee) = &issue.assignee {
            builder = builder.assignees(vec![assignee.clone()]);
        }
        if let Some(milestone) = issue.milestone {
            builder = builder.milestone(milestone);
        }

        let created = builder.send().await?;
        Ok(created.number)
    }

    async fn edit_issue(&self, number: u64, state: IssueState) -> Result<(), TrackerError> {
        let state = match state {
            IssueState::Open => models::IssueState::Open,
            IssueState::Closed => models::IssueState::Closed,
        };
        self.octocrab
            .issues(&self.owner, &self.repo)
            .update(number)
            .state(state)
            .send()
            .await?;
        Ok(())
    }

    async fn create_comment(
        &self,
        number: u64,
        body: &str,
        user: &str,
    ) -> Result<(), TrackerError> {
        // Comments are always authored by the token owner.
        debug!(issue_number = number, user, "Creating comment");
        self.octocrab
            .issues(&self.owner, &self.repo)
            .create_comment(number, body)
            .await?;
        Ok(())
    }
}

/// A full page means more milestones may follow.
fn is_full_page(fetched: usize, per_page: u8) -> bool {
    fetched > 0 && fetched >= usize::from(per_page)
}
