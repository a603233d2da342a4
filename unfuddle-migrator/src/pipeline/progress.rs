//! `(n/total)` progress counter.

use std::fmt;

/// Counts completed items out of a known total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    completed: usize,
    total: usize,
}

impl Progress {
    /// Starts a counter at zero.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self { completed: 0, total }
    }

    /// Records one completed item and returns the updated counter.
    pub fn advance(&mut self) -> Self {
        self.completed += 1;
        *self
    }

    /// Completed items.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}/{})", self.completed, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_completed_over_total() {
        let mut progress = Progress::new(3);
        assert_eq!(progress.to_string(), "(0/3)");

        progress.advance();
        let snapshot = progress.advance();

        assert_eq!(snapshot.to_string(), "(2/3)");
        assert_eq!(progress.completed(), 2);
    }
}
