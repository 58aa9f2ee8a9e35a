//! Bounded worker pool over a shared task queue.
//!
//! `concurrency` threads pop tasks from one queue until it is empty or the
//! batch is cancelled. Each outcome is sent over a channel to the calling
//! thread, which is the only place counts are updated. Tasks left in the
//! queue after a cancellation become `Skipped` outcomes.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::fetcher::{Fetch, FetchContext, FetchError};
use crate::report::{ReportBuilder, ReportSummary};
use crate::task::{DownloadOutcome, DownloadTask, OutcomeStatus};

use super::progress::ProgressStats;

/// Everything a finished batch produced: one outcome per input task, ordered
/// by `sequence_index`, and the aggregated summary.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub outcomes: Vec<DownloadOutcome>,
    pub summary: ReportSummary,
}

/// Runs every task through `fetcher` with at most `concurrency` fetches in
/// flight (`0` is treated as 1). Blocks until each task has an outcome. A
/// failing task never stops the pool; cancellation through `ctx.cancel`
/// stops workers from pulling more tasks and returns promptly.
pub fn run_all<F: Fetch>(
    tasks: Vec<DownloadTask>,
    concurrency: usize,
    fetcher: &F,
    ctx: &FetchContext<'_>,
    progress_tx: Option<&mpsc::Sender<ProgressStats>>,
) -> RunResult {
    let total = tasks.len();
    let mut builder = ReportBuilder::new();
    let mut outcomes = Vec::with_capacity(total);
    if total == 0 {
        return RunResult {
            outcomes,
            summary: builder.finish(),
        };
    }

    let num_workers = concurrency.max(1).min(total);
    let work: Mutex<VecDeque<DownloadTask>> = Mutex::new(tasks.into());
    let (tx, rx) = mpsc::channel::<DownloadOutcome>();

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            let handle = thread::Builder::new()
                .name(format!("imgdl-worker-{}", worker_id))
                .spawn_scoped(s, move || worker_loop(work, fetcher, ctx, &tx));
            match handle {
                Ok(h) => handles.push(h),
                // Remaining workers (at least the ones already running) drain the queue.
                Err(e) => tracing::warn!("could not spawn worker {}: {}", worker_id, e),
            }
        }
        drop(tx);

        for outcome in rx {
            collect(&mut builder, &mut outcomes, outcome, total, progress_tx);
        }
        for h in handles {
            if h.join().is_err() {
                tracing::error!("worker thread panicked outside a fetch");
            }
        }
    });

    // Anything still queued was never started: cancelled, or no worker could be spawned.
    let leftover: Vec<DownloadTask> = work
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .collect();
    if !leftover.is_empty() {
        tracing::info!("{} task(s) not started", leftover.len());
    }
    let cancelled = ctx.cancel.is_cancelled();
    for task in leftover {
        collect(
            &mut builder,
            &mut outcomes,
            not_started(task, cancelled),
            total,
            progress_tx,
        );
    }

    outcomes.sort_by_key(|o| o.task.sequence_index);
    RunResult {
        outcomes,
        summary: builder.finish(),
    }
}

/// Outcome for a task still queued when the workers stopped. Without a
/// cancellation that means no worker was left to run it.
fn not_started(task: DownloadTask, cancelled: bool) -> DownloadOutcome {
    if cancelled {
        DownloadOutcome::skipped(task)
    } else {
        DownloadOutcome::failed(task, FetchError::Internal("worker unavailable".to_string()))
    }
}

fn worker_loop<F: Fetch>(
    work: &Mutex<VecDeque<DownloadTask>>,
    fetcher: &F,
    ctx: &FetchContext<'_>,
    tx: &mpsc::Sender<DownloadOutcome>,
) {
    loop {
        if ctx.cancel.is_cancelled() {
            break;
        }
        let next = work.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        let Some(task) = next else {
            break;
        };
        let outcome = fetch_guarded(fetcher, &task, ctx);
        if tx.send(outcome).is_err() {
            break;
        }
    }
}

/// A panicking fetch still yields exactly one outcome for its task.
fn fetch_guarded<F: Fetch>(fetcher: &F, task: &DownloadTask, ctx: &FetchContext<'_>) -> DownloadOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(task, ctx))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(url = %task.url, "fetch panicked: {}", message);
            DownloadOutcome::failed(task.clone(), FetchError::Internal(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn collect(
    builder: &mut ReportBuilder,
    outcomes: &mut Vec<DownloadOutcome>,
    outcome: DownloadOutcome,
    total: usize,
    progress_tx: Option<&mpsc::Sender<ProgressStats>>,
) {
    match outcome.status {
        OutcomeStatus::Success => tracing::info!(
            url = %outcome.task.url,
            "saved {}",
            outcome.saved_path().map(|p| p.display().to_string()).unwrap_or_default()
        ),
        OutcomeStatus::Failed => tracing::warn!(
            url = %outcome.task.url,
            "download failed: {}",
            outcome.reason().unwrap_or_default()
        ),
        OutcomeStatus::Skipped => tracing::debug!(url = %outcome.task.url, "skipped"),
    }
    builder.record(&outcome);
    outcomes.push(outcome);
    if let Some(tx) = progress_tx {
        let _ = tx.send(ProgressStats::from_summary(builder.current(), total));
    }
}
