//! Comment migration.
//!
//! Comments of one ticket are created strictly one after another, in backup
//! order, so the remote display order matches the source.

use crate::attachments::relocate_attachments;
use crate::backup::SourceComment;
use crate::issues::{append_attachment_links, RemoteIssue};
use crate::lookup::IdentifierMap;
use crate::pipeline::{MigrationContext, MigrationError, Progress};
use crate::summary::RunSummary;
use tracing::{debug, info};

/// Builds a comment body carrying the original author and timestamp.
#[must_use]
pub fn compose_comment_body(comment: &SourceComment) -> String {
    format!(
        "{}\n\nUF Created: {} User: {}",
        comment.body,
        comment.created_at,
        comment.author_id.as_deref().unwrap_or("unknown")
    )
}

/// Resolves the GitHub user a comment is attributed to.
#[must_use]
pub fn resolve_author<'a>(
    comment: &SourceComment,
    ids: &'a IdentifierMap,
    default_user: &'a str,
) -> &'a str {
    comment
        .author_id
        .as_deref()
        .and_then(|id| ids.user(id))
        .unwrap_or(default_user)
}

/// Migrates every comment of a ticket onto its created issue.
///
/// # Errors
///
/// Returns the first [`MigrationError`] from an upload or comment creation.
/// Later comments are not attempted.
pub async fn migrate_comments(
    ctx: &MigrationContext<'_>,
    ids: &IdentifierMap,
    comments: &[SourceComment],
    issue: &RemoteIssue,
    summary: &mut RunSummary,
) -> Result<(), MigrationError> {
    let mut progress = Progress::new(comments.len());
    for comment in comments {
        migrate_comment(ctx, ids, comment, issue, &mut progress, summary).await?;
    }
    Ok(())
}

async fn migrate_comment(
    ctx: &MigrationContext<'_>,
    ids: &IdentifierMap,
    comment: &SourceComment,
    issue: &RemoteIssue,
    progress: &mut Progress,
    summary: &mut RunSummary,
) -> Result<(), MigrationError> {
    let mut body = compose_comment_body(comment);

    let urls = relocate_attachments(ctx, &comment.attachments).await?;
    summary.attachments_uploaded += urls.len();
    append_attachment_links(&mut body, &urls);

    let user = resolve_author(comment, ids, ctx.options().default_issue_user());
    debug!(comment_id = %comment.id, user, "Composed comment");

    if !ctx.dry_run() {
        ctx.tracker()
            .create_comment(issue.number, &body, user)
            .await
            .map_err(MigrationError::remote("create_comment"))?;
    }

    summary.comments_created += 1;
    info!(
        comment_id = %comment.id,
        "{}{} Saved comment to issue: {}",
        ctx.log_prefix(),
        progress.advance(),
        issue.number
    );
    Ok(())
}
