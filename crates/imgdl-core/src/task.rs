//! Download tasks and their terminal outcomes.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::fetcher::FetchError;

/// One URL to download, tagged with its position in the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub sequence_index: usize,
}

impl DownloadTask {
    pub fn new(url: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            url: url.into(),
            sequence_index,
        }
    }
}

/// Build tasks from an ordered URL list; `sequence_index` is the list position.
pub fn tasks_from_urls<I, S>(urls: I) -> Vec<DownloadTask>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    urls.into_iter()
        .enumerate()
        .map(|(i, url)| DownloadTask::new(url, i))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failed,
    Skipped,
}

/// Terminal result of one task. Created once by the worker (or by the
/// dispatcher for tasks that never started) and not modified afterwards.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub task: DownloadTask,
    pub status: OutcomeStatus,
    pub saved_path: Option<PathBuf>,
    pub error: Option<FetchError>,
    pub bytes_written: Option<u64>,
}

impl DownloadOutcome {
    pub fn success(task: DownloadTask, saved_path: PathBuf, bytes_written: u64) -> Self {
        Self {
            task,
            status: OutcomeStatus::Success,
            saved_path: Some(saved_path),
            error: None,
            bytes_written: Some(bytes_written),
        }
    }

    pub fn failed(task: DownloadTask, error: FetchError) -> Self {
        Self {
            task,
            status: OutcomeStatus::Failed,
            saved_path: None,
            error: Some(error),
            bytes_written: None,
        }
    }

    /// A task that was not (fully) attempted because the batch was cancelled.
    pub fn skipped(task: DownloadTask) -> Self {
        Self {
            task,
            status: OutcomeStatus::Skipped,
            saved_path: None,
            error: Some(FetchError::Cancelled),
            bytes_written: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn saved_path(&self) -> Option<&Path> {
        self.saved_path.as_deref()
    }

    /// Human-readable reason for a non-successful outcome.
    pub fn reason(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}
