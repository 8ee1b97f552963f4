//! Run-level tallies and the closing summary block

use ci_sync_runtime::deps::{MessageStyle, UserInterface};

use super::mutate::{ItemOutcome, SequentialReport};

/// Aggregate outcome of one command run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items whose operation was started
    pub attempted: usize,
    /// Items whose operation succeeded
    pub succeeded: usize,
    /// Items whose operation failed
    pub failed: usize,
    /// Input entries excluded before any call was made
    pub skipped: usize,
    /// Items left untouched after a fail-fast abort
    pub not_attempted: usize,
}

impl RunSummary {
    /// Tally a set of settled outcomes
    pub fn from_outcomes<T, R>(outcomes: &[ItemOutcome<T, R>]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            attempted: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            ..Self::default()
        }
    }

    /// Record input entries that were excluded up front
    #[must_use]
    pub const fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    /// Whether the run finished without a single failure
    pub const fn is_success(&self) -> bool {
        self.failed == 0 && self.not_attempted == 0
    }

    /// Print the closing summary block
    pub fn print(&self, ui: &dyn UserInterface) {
        ui.print("");
        ui.print_styled("Summary", MessageStyle::Bold);
        ui.print(&format!("  Attempted: {}", self.attempted));
        ui.print(&format!("  Succeeded: {}", self.succeeded));
        ui.print(&format!("  Failed:    {}", self.failed));
        if self.skipped > 0 {
            ui.print(&format!("  Skipped:   {}", self.skipped));
        }
        if self.not_attempted > 0 {
            ui.print(&format!("  Not attempted: {}", self.not_attempted));
        }
        ui.print("");

        let line = format!("{} succeeded, {} failed", self.succeeded, self.failed);
        if self.is_success() {
            ui.print_styled(&format!("✓ {line}"), MessageStyle::Success);
        } else {
            ui.print_styled(&format!("✗ {line}"), MessageStyle::Error);
        }
    }
}

impl<T> From<&SequentialReport<T>> for RunSummary {
    fn from(report: &SequentialReport<T>) -> Self {
        Self {
            attempted: report.attempted,
            succeeded: report.succeeded,
            failed: report.attempted - report.succeeded,
            skipped: 0,
            not_attempted: report.not_attempted,
        }
    }
}
