//! Progress reporting for a running batch.
//!
//! The pool sends one snapshot per finished task; the CLI renders them.

use crate::report::ReportSummary;

/// Snapshot of batch progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStats {
    /// Tasks with an outcome so far.
    pub completed: usize,
    /// Tasks in the batch.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Bytes saved by successful tasks.
    pub bytes_written: u64,
}

impl ProgressStats {
    pub fn from_summary(summary: &ReportSummary, total: usize) -> Self {
        Self {
            completed: summary.total,
            total,
            succeeded: summary.succeeded,
            failed: summary.failed,
            skipped: summary.skipped,
            bytes_written: summary.bytes_written,
        }
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_and_remaining() {
        let summary = ReportSummary {
            total: 3,
            succeeded: 2,
            failed: 1,
            ..ReportSummary::default()
        };
        let p = ProgressStats::from_summary(&summary, 4);
        assert_eq!(p.completed, 3);
        assert_eq!(p.remaining(), 1);
        assert!((p.fraction() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn empty_batch_is_complete() {
        let p = ProgressStats::from_summary(&ReportSummary::default(), 0);
        assert_eq!(p.fraction(), 1.0);
        assert_eq!(p.remaining(), 0);
    }
}
