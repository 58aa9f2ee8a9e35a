//! Batch scheduling.
//!
//! Fans download tasks out to a bounded pool of worker threads, collects
//! their outcomes over a channel and folds them into a `ReportSummary`:
//! output dir check → name registry → tasks → pool → summary.

mod pool;
mod progress;
mod run;

pub use pool::{run_all, RunResult};
pub use progress::ProgressStats;
pub use run::{run_batch, run_batch_with};
