//! Per-task fetch errors. Each one ends up in a `Failed` (or `Skipped`) outcome.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Coarse error classes reported in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed URL, DNS failure, refused or timed-out connect, TLS handshake.
    Connection,
    /// Final response status outside 200..=299.
    Http,
    /// Stream broke after the response started (timeout, reset, short body).
    Transport,
    /// Output file could not be created or written.
    Filesystem,
    /// Response was not an image while only images are accepted.
    ContentType,
    /// The batch was cancelled while this task was running.
    Cancelled,
    /// The fetch itself panicked; the pool recorded it instead of losing the task.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("HTTP {status}")]
    Http { status: u32 },
    #[error("transfer interrupted: {0}")]
    Transport(String),
    #[error("cannot write {}: {message}", .path.display())]
    Filesystem { path: PathBuf, message: String },
    #[error("invalid image type {content_type:?}")]
    UnexpectedContentType { content_type: String },
    #[error("cancelled")]
    Cancelled,
    #[error("internal error: {0}")]
    Internal(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Connection(_) => ErrorKind::Connection,
            FetchError::Http { .. } => ErrorKind::Http,
            FetchError::Transport(_) => ErrorKind::Transport,
            FetchError::Filesystem { .. } => ErrorKind::Filesystem,
            FetchError::UnexpectedContentType { .. } => ErrorKind::ContentType,
            FetchError::Cancelled => ErrorKind::Cancelled,
            FetchError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn filesystem(path: &Path, err: &io::Error) -> Self {
        FetchError::Filesystem {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}
