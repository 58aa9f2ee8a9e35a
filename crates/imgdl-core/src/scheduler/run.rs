//! One-call batch entry point: prepare the output directory, then run the pool.

use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

use crate::config::ImgdlConfig;
use crate::control::CancelToken;
use crate::fetcher::{Fetch, FetchContext, FetchOptions, HttpFetcher};
use crate::resolver::NameRegistry;
use crate::storage::{ensure_output_dir, SetupError};
use crate::task::tasks_from_urls;

use super::pool::{run_all, RunResult};
use super::progress::ProgressStats;

/// Downloads `urls` into `output_dir` with the libcurl fetcher configured from `cfg`.
///
/// Fails only when the output directory is unusable; every per-URL problem
/// is reported in the returned outcomes and summary.
pub fn run_batch(
    urls: &[String],
    output_dir: &Path,
    cfg: &ImgdlConfig,
    cancel: &CancelToken,
    progress_tx: Option<&mpsc::Sender<ProgressStats>>,
) -> Result<RunResult, SetupError> {
    let fetcher = HttpFetcher::new(FetchOptions::from(cfg));
    run_batch_with(&fetcher, urls, output_dir, cfg.effective_concurrency(), cancel, progress_tx)
}

/// Like [`run_batch`] with a caller-supplied fetcher and explicit concurrency.
pub fn run_batch_with<F: Fetch>(
    fetcher: &F,
    urls: &[String],
    output_dir: &Path,
    concurrency: usize,
    cancel: &CancelToken,
    progress_tx: Option<&mpsc::Sender<ProgressStats>>,
) -> Result<RunResult, SetupError> {
    ensure_output_dir(output_dir)?;
    let registry = NameRegistry::from_dir(output_dir).map_err(|source| SetupError::List {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let tasks = tasks_from_urls(urls.iter().cloned());
    tracing::info!(
        "downloading {} URL(s) to {} with {} worker(s)",
        tasks.len(),
        output_dir.display(),
        concurrency.max(1)
    );

    let started = Instant::now();
    let ctx = FetchContext {
        output_dir,
        registry: &registry,
        cancel,
    };
    let result = run_all(tasks, concurrency, fetcher, &ctx, progress_tx);

    let s = &result.summary;
    tracing::info!(
        total = s.total,
        succeeded = s.succeeded,
        failed = s.failed,
        skipped = s.skipped,
        bytes = s.bytes_written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch finished"
    );
    Ok(result)
}
