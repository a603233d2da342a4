//! Migration orchestration.
//!
//! A run moves through four strictly ordered phases: lookup tables,
//! milestones, tickets, done. Tickets are migrated one at a time in backup
//! order; within a ticket the steps follow [`TicketState`]. The only
//! concurrency is the upload fan-out of sibling attachments.

mod error;
mod options;
mod progress;

pub use error::{MappingError, MigrationError};
pub use options::{MigrationOptions, DEFAULT_CONCURRENCY};
pub use progress::Progress;

use crate::attachments::relocate_attachments;
use crate::backup::{SourceProject, SourceTicket};
use crate::comments::migrate_comments;
use crate::issues::{close_issue, compose_issue, create_issue, TicketState};
use crate::lookup::IdentifierMap;
use crate::milestones::migrate_milestones;
use crate::storage::ObjectStore;
use crate::summary::RunSummary;
use crate::tracker::IssueTracker;
use std::fmt;
use tracing::{debug, info, info_span, Instrument};

/// Log prefix marking messages with no remote effect.
pub const DRY_RUN_PREFIX: &str = "[DRY RUN] ";

/// Top-level migration phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lookups,
    Milestones,
    Tickets,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookups => write!(f, "Reading lookup tables"),
            Self::Milestones => write!(f, "Migrating milestones"),
            Self::Tickets => write!(f, "Migrating tickets"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Remote capabilities and options shared by every migration step.
#[derive(Clone, Copy)]
pub struct MigrationContext<'a> {
    tracker: &'a dyn IssueTracker,
    store: &'a dyn ObjectStore,
    options: &'a MigrationOptions,
}

impl<'a> MigrationContext<'a> {
    /// Bundles the tracker, store and options of a run.
    pub fn new(
        tracker: &'a dyn IssueTracker,
        store: &'a dyn ObjectStore,
        options: &'a MigrationOptions,
    ) -> Self {
        Self {
            tracker,
            store,
            options,
        }
    }

    /// Returns the issue tracker.
    pub fn tracker(&self) -> &'a dyn IssueTracker {
        self.tracker
    }

    /// Returns the object store.
    pub fn store(&self) -> &'a dyn ObjectStore {
        self.store
    }

    /// Returns the run options.
    pub fn options(&self) -> &'a MigrationOptions {
        self.options
    }

    /// Returns whether remote writes are suppressed.
    pub fn dry_run(&self) -> bool {
        self.options.dry_run()
    }

    /// Prefix for progress messages.
    pub fn log_prefix(&self) -> &'static str {
        if self.dry_run() {
            DRY_RUN_PREFIX
        } else {
            ""
        }
    }
}

/// Runs the full migration of one project.
pub struct Migrator<'a> {
    ctx: MigrationContext<'a>,
}

impl<'a> Migrator<'a> {
    /// Creates a migrator writing through `tracker` and `store`.
    pub fn new(
        tracker: &'a dyn IssueTracker,
        store: &'a dyn ObjectStore,
        options: &'a MigrationOptions,
    ) -> Self {
        Self {
            ctx: MigrationContext::new(tracker, store, options),
        }
    }

    /// Executes every phase in order.
    ///
    /// `ids` must carry the user table; it is filled with component, field
    /// and milestone mappings as the phases complete.
    ///
    /// # Errors
    ///
    /// Returns the first [`MigrationError`]. Nothing is retried and no later
    /// step runs after a failure.
    pub async fn run(
        &self,
        project: &SourceProject,
        ids: &mut IdentifierMap,
    ) -> Result<RunSummary, MigrationError> {
        let mut summary = RunSummary::new(self.ctx.dry_run());

        info!("{}", Phase::Lookups);
        ids.load_labels(&project.components, &project.field_values);

        info!(count = project.milestones.len(), "{}", Phase::Milestones);
        migrate_milestones(&self.ctx, &project.milestones, ids, &mut summary).await?;

        info!(count = project.tickets.len(), "{}", Phase::Tickets);
        let mut progress = Progress::new(project.tickets.len());
        for ticket in &project.tickets {
            let span = info_span!("ticket", ticket_id = %ticket.id);
            let state = self
                .migrate_ticket(ticket, ids, &mut progress, &mut summary)
                .instrument(span)
                .await?;
            debug!(ticket_id = %ticket.id, state = %state, "Ticket migrated");
        }

        info!(phase = %Phase::Done, "{}Done!", self.ctx.log_prefix());
        Ok(summary)
    }

    /// Migrates one ticket and returns its terminal state.
    async fn migrate_ticket(
        &self,
        ticket: &SourceTicket,
        ids: &IdentifierMap,
        progress: &mut Progress,
        summary: &mut RunSummary,
    ) -> Result<TicketState, MigrationError> {
        let ctx = &self.ctx;
        let mut state = TicketState::Pending;

        let urls = relocate_attachments(ctx, &ticket.attachments).await?;
        summary.attachments_uploaded += urls.len();
        state = advance(ticket, state, TicketState::AttachmentsUploaded)?;

        let mut draft = compose_issue(ticket, ids)?;
        draft.append_attachment_links(&urls);
        let mut issue = create_issue(ctx, draft, progress).await?;
        summary.issues_created += 1;
        state = advance(ticket, state, TicketState::IssueCreated)?;

        migrate_comments(ctx, ids, &ticket.comments, &issue, summary).await?;
        state = advance(ticket, state, TicketState::CommentsMigrated)?;

        if ticket.status.is_closed() {
            close_issue(ctx, &mut issue).await?;
            summary.issues_closed += 1;
            advance(ticket, state, TicketState::Closed)
        } else {
            advance(ticket, state, TicketState::OpenFinal)
        }
    }
}

fn advance(
    ticket: &SourceTicket,
    from: TicketState,
    to: TicketState,
) -> Result<TicketState, MigrationError> {
    if from.can_advance_to(to) {
        Ok(to)
    } else {
        Err(MigrationError::InvalidTransition {
            ticket: ticket.id.clone(),
            from,
            to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_describe_themselves() {
        assert_eq!(Phase::Milestones.to_string(), "Migrating milestones");
        assert_eq!(Phase::Done.to_string(), "Done");
    }
}
