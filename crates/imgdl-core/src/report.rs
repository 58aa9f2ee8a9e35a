//! Result aggregation: counts per status and the ordered failure list.

use serde::Serialize;
use std::fmt;

use crate::task::{DownloadOutcome, OutcomeStatus};

/// One failed task in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub sequence_index: usize,
    pub url: String,
    pub reason: String,
}

/// Final result of a batch. `total` always equals the number of outcomes
/// recorded; `failures` is ordered by input position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub bytes_written: u64,
    pub failures: Vec<FailureEntry>,
}

impl ReportSummary {
    /// True when every task succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Downloaded {} files, {} failed, {} skipped ({} entries)",
            self.succeeded, self.failed, self.skipped, self.total
        )?;
        for failure in &self.failures {
            write!(f, "\n  #{} {}: {}", failure.sequence_index, failure.url, failure.reason)?;
        }
        Ok(())
    }
}

/// Incrementally folds outcomes as they arrive from the workers.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    summary: ReportSummary,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &DownloadOutcome) {
        let s = &mut self.summary;
        s.total += 1;
        match outcome.status {
            OutcomeStatus::Success => {
                s.succeeded += 1;
                s.bytes_written += outcome.bytes_written.unwrap_or(0);
            }
            OutcomeStatus::Failed => {
                s.failed += 1;
                s.failures.push(FailureEntry {
                    sequence_index: outcome.task.sequence_index,
                    url: outcome.task.url.clone(),
                    reason: outcome.reason().unwrap_or_else(|| "unknown error".to_string()),
                });
            }
            OutcomeStatus::Skipped => s.skipped += 1,
        }
    }

    /// Counts so far (failures not yet sorted).
    pub fn current(&self) -> &ReportSummary {
        &self.summary
    }

    pub fn finish(mut self) -> ReportSummary {
        self.summary.failures.sort_by_key(|f| f.sequence_index);
        self.summary
    }
}

/// Summarize a complete set of outcomes.
pub fn summarize<'a, I>(outcomes: I) -> ReportSummary
where
    I: IntoIterator<Item = &'a DownloadOutcome>,
{
    let mut builder = ReportBuilder::new();
    for outcome in outcomes {
        builder.record(outcome);
    }
    builder.finish()
}
