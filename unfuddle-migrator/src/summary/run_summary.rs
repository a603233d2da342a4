//! Run summary types.

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of pre-existing remote milestones deleted.
    pub milestones_deleted: usize,

    /// Number of milestones recreated from the backup.
    pub milestones_created: usize,

    /// Number of issues created.
    pub issues_created: usize,

    /// Number of issues closed after their comments were migrated.
    pub issues_closed: usize,

    /// Number of comments created.
    pub comments_created: usize,

    /// Number of attachments uploaded.
    pub attachments_uploaded: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_summary_starts_empty() {
        let summary = RunSummary::new(true);

        assert!(summary.dry_run);
        assert_eq!(
            summary,
            RunSummary {
                dry_run: true,
                ..RunSummary::default()
            }
        );
        assert_eq!(summary.issues_created, 0);
    }
}
