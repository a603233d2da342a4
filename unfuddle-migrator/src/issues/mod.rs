//! Issue composition and creation.
//!
//! [`compose_issue`] is a pure mapping from a ticket and the lookup tables
//! to an [`IssueDraft`]. Creating and closing issues goes through the
//! tracker held by the [`MigrationContext`].

mod draft;
mod state;

pub use draft::{append_attachment_links, IssueDraft, RemoteIssue};
pub use state::TicketState;

use crate::backup::SourceTicket;
use crate::lookup::IdentifierMap;
use crate::pipeline::{MappingError, MigrationContext, MigrationError, Progress};
use crate::tracker::IssueState;
use tracing::info;

/// Heading placed above a ticket's resolution text.
pub const RESOLUTION_HEADING: &str = "**Resolution Message**";

/// Builds the issue draft for a ticket.
///
/// - The assignee is set only if the ticket's assignee maps to a GitHub user.
/// - The milestone is set whenever the ticket names one; it must already be
///   in the milestone table.
/// - Labels are the component label, the custom-field label (each when
///   resolvable) and always `p<priority>`.
/// - Non-empty resolution text is appended under [`RESOLUTION_HEADING`].
///
/// # Errors
///
/// Returns [`MappingError::Unresolved`] if the ticket names a milestone that
/// was never recorded.
pub fn compose_issue(ticket: &SourceTicket, ids: &IdentifierMap) -> Result<IssueDraft, MappingError> {
    let mut draft = IssueDraft::new(ticket.title.clone(), ticket.description.clone());

    draft.assignee = ticket
        .assignee_id
        .as_deref()
        .and_then(|id| ids.user(id))
        .map(str::to_string);

    if let Some(milestone_id) = ticket.milestone_id.as_deref().filter(|id| !id.is_empty()) {
        let number = ids
            .milestone(milestone_id)
            .ok_or_else(|| MappingError::Unresolved {
                kind: "milestone",
                id: milestone_id.to_string(),
            })?;
        draft.milestone = Some(number);
    }

    if let Some(label) = ticket.component_id.as_deref().and_then(|id| ids.component(id)) {
        draft.labels.push(label.to_string());
    }
    if let Some(label) = ticket
        .field_value_id
        .as_deref()
        .and_then(|id| ids.field_value(id))
    {
        draft.labels.push(label.to_string());
    }
    draft.labels.push(format!("p{}", ticket.priority));

    if let Some(resolution) = ticket.resolution.as_deref().filter(|r| !r.is_empty()) {
        draft.body.push_str("\n\n");
        draft.body.push_str(RESOLUTION_HEADING);
        draft.body.push('\n');
        draft.body.push_str(resolution);
    }

    Ok(draft)
}

/// Creates the remote issue for a finished draft.
///
/// In dry-run mode nothing is sent and the progress count stands in for the
/// issue number.
///
/// # Errors
///
/// Returns [`MigrationError::RemoteApi`] if the tracker rejects the issue.
pub async fn create_issue(
    ctx: &MigrationContext<'_>,
    draft: IssueDraft,
    progress: &mut Progress,
) -> Result<RemoteIssue, MigrationError> {
    let number = if ctx.dry_run() {
        progress.completed() as u64 + 1
    } else {
        ctx.tracker()
            .create_issue(&draft)
            .await
            .map_err(MigrationError::remote("create_issue"))?
    };

    let issue = draft.commit(number);
    info!(
        issue_number = issue.number,
        "{}{} Saved issue: {}",
        ctx.log_prefix(),
        progress.advance(),
        issue.title()
    );
    Ok(issue)
}

/// Closes a created issue.
///
/// # Errors
///
/// Returns [`MigrationError::RemoteApi`] if the tracker rejects the edit.
pub async fn close_issue(
    ctx: &MigrationContext<'_>,
    issue: &mut RemoteIssue,
) -> Result<(), MigrationError> {
    if !ctx.dry_run() {
        ctx.tracker()
            .edit_issue(issue.number, IssueState::Closed)
            .await
            .map_err(MigrationError::remote("edit_issue"))?;
    }

    issue.state = IssueState::Closed;
    info!(
        issue_number = issue.number,
        "{}Closed issue: {}",
        ctx.log_prefix(),
        issue.title()
    );
    Ok(())
}
