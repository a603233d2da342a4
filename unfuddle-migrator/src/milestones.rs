//! Milestone migration.
//!
//! Every remote milestone is deleted first, then each source milestone is
//! recreated in backup order and its remote number recorded. Tickets refer
//! to milestones by source id, so this phase must finish before any ticket
//! is migrated.

use crate::backup::SourceMilestone;
use crate::lookup::IdentifierMap;
use crate::pipeline::{MigrationContext, MigrationError, Progress};
use crate::summary::RunSummary;
use crate::tracker::{MilestoneState, NewMilestone};
use tracing::{debug, info};

/// Page size used when listing remote milestones.
pub const MILESTONE_PAGE_SIZE: u8 = 100;

/// Resets remote milestones and recreates the backup's milestones.
///
/// # Errors
///
/// Any list, delete or create failure is returned as
/// [`MigrationError::RemoteApi`] and aborts the run.
pub async fn migrate_milestones(
    ctx: &MigrationContext<'_>,
    milestones: &[SourceMilestone],
    ids: &mut IdentifierMap,
    summary: &mut RunSummary,
) -> Result<(), MigrationError> {
    reset_milestones(ctx, summary).await?;

    let mut progress = Progress::new(milestones.len());
    for milestone in milestones {
        let request = new_milestone(milestone);
        let number = if ctx.dry_run() {
            // Placeholder numbers keep ticket composition identical.
            progress.completed() as u64 + 1
        } else {
            ctx.tracker()
                .create_milestone(&request)
                .await
                .map_err(MigrationError::remote("create_milestone"))?
        };

        ids.insert_milestone(milestone.id.clone(), number);
        summary.milestones_created += 1;
        info!(
            source_id = %milestone.id,
            milestone_number = number,
            "{}{} Milestone saved: {}",
            ctx.log_prefix(),
            progress.advance(),
            request.title
        );
    }

    Ok(())
}

/// Deletes every milestone currently on the remote, whatever its state.
async fn reset_milestones(
    ctx: &MigrationContext<'_>,
    summary: &mut RunSummary,
) -> Result<(), MigrationError> {
    info!("{}Resetting existing milestones", ctx.log_prefix());
    if ctx.dry_run() {
        debug!("Skipping deletion of existing milestones");
        return Ok(());
    }

    let existing = ctx
        .tracker()
        .list_milestones(MilestoneState::All, MILESTONE_PAGE_SIZE)
        .await
        .map_err(MigrationError::remote("list_milestones"))?;

    for milestone in existing {
        ctx.tracker()
            .delete_milestone(milestone.number)
            .await
            .map_err(MigrationError::remote("delete_milestone"))?;
        summary.milestones_deleted += 1;
        info!(milestone_number = milestone.number, "Milestone deleted: {}", milestone.title);
    }

    Ok(())
}

/// Maps a source milestone onto a creation request.
#[must_use]
pub fn new_milestone(milestone: &SourceMilestone) -> NewMilestone {
    NewMilestone {
        title: milestone.title.clone(),
        state: if milestone.completed {
            MilestoneState::Closed
        } else {
            MilestoneState::Open
        },
        description: milestone.description.clone(),
    }
}
