//! Per-ticket migration state machine.

use std::fmt;

/// Progress of a single ticket through the migration.
///
/// `Pending -> AttachmentsUploaded -> IssueCreated -> CommentsMigrated`,
/// then either `Closed` or `OpenFinal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketState {
    Pending,
    AttachmentsUploaded,
    IssueCreated,
    CommentsMigrated,
    Closed,
    OpenFinal,
}

impl TicketState {
    /// Returns true if `next` directly follows `self`.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::AttachmentsUploaded)
                | (Self::AttachmentsUploaded, Self::IssueCreated)
                | (Self::IssueCreated, Self::CommentsMigrated)
                | (Self::CommentsMigrated, Self::Closed | Self::OpenFinal)
        )
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::AttachmentsUploaded => "attachments-uploaded",
            Self::IssueCreated => "issue-created",
            Self::CommentsMigrated => "comments-migrated",
            Self::Closed => "closed",
            Self::OpenFinal => "open-final",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_the_happy_path() {
        let path = [
            TicketState::Pending,
            TicketState::AttachmentsUploaded,
            TicketState::IssueCreated,
            TicketState::CommentsMigrated,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        assert!(TicketState::CommentsMigrated.can_advance_to(TicketState::Closed));
        assert!(TicketState::CommentsMigrated.can_advance_to(TicketState::OpenFinal));
    }

    #[test]
    fn rejects_skipped_predecessors() {
        assert!(!TicketState::Pending.can_advance_to(TicketState::IssueCreated));
        assert!(!TicketState::IssueCreated.can_advance_to(TicketState::Closed));
        assert!(!TicketState::Closed.can_advance_to(TicketState::OpenFinal));
        assert!(!TicketState::OpenFinal.can_advance_to(TicketState::Pending));
    }
}
