//! Single-URL fetcher.
//!
//! Performs one HTTP GET through libcurl (redirects followed, connect and
//! read timeouts), validates the response and streams the body into the
//! output directory under a name claimed from the `NameRegistry`. Every
//! failure is turned into a `Failed` outcome here; nothing propagates to the
//! pool. No retries.

mod classify;
mod error;
mod head;
mod sink;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::control::CancelToken;
use crate::resolver::NameRegistry;
use crate::task::{DownloadOutcome, DownloadTask};

pub use classify::classify_curl_error;
pub use error::{ErrorKind, FetchError};

use classify::fetch_error_from_curl;
use head::ResponseHead;
use sink::BodySink;

/// Shared per-run state handed to every fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchContext<'a> {
    pub output_dir: &'a Path,
    pub registry: &'a NameRegistry,
    pub cancel: &'a CancelToken,
}

/// Executes one task and reports its outcome. Implemented by [`HttpFetcher`];
/// tests drive the pool with instrumented implementations.
pub trait Fetch: Sync {
    fn fetch(&self, task: &DownloadTask, ctx: &FetchContext<'_>) -> DownloadOutcome;
}

/// Transfer settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Abort when no body byte arrives for this long.
    pub read_timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: Option<String>,
    /// Reject responses whose Content-Type is not `image/*`.
    pub images_only: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(30),
            max_redirections: 10,
            user_agent: None,
            images_only: true,
        }
    }
}

/// libcurl-backed fetcher. One `Easy` handle per task.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    options: FetchOptions,
}

impl HttpFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.options.max_redirections)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        // Read timeout: less than 1 byte/s for `read_timeout` aborts the transfer.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.options.read_timeout)?;
        easy.progress(true)?;
        if let Some(ua) = &self.options.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }

    fn transfer(&self, task: &DownloadTask, ctx: &FetchContext<'_>) -> Result<(PathBuf, u64), FetchError> {
        if ctx.cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        validate_url(&task.url)?;

        let head = RefCell::new(ResponseHead::default());
        let sink = RefCell::new(BodySink::new(
            &task.url,
            ctx.output_dir,
            ctx.registry,
            self.options.images_only,
        ));

        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, &task.url)
            .map_err(|e| fetch_error_from_curl(&e, false))?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    head.borrow_mut().push_line(data);
                    true
                })
                .map_err(|e| fetch_error_from_curl(&e, false))?;
            transfer
                .write_function(|data| {
                    let head = head.borrow();
                    if sink.borrow_mut().accept(&head, data) {
                        Ok(data.len())
                    } else {
                        Ok(0) // abort transfer
                    }
                })
                .map_err(|e| fetch_error_from_curl(&e, false))?;
            transfer
                .progress_function(|_, _, _, _| !ctx.cancel.is_cancelled())
                .map_err(|e| fetch_error_from_curl(&e, false))?;
            transfer.perform()
        };

        let head = head.into_inner();
        let mut sink = sink.into_inner();

        if let Err(e) = performed {
            // Dropping the sink removes any partially written file.
            if let Some(failure) = sink.take_failure() {
                return Err(failure);
            }
            let err = fetch_error_from_curl(&e, head.status.is_some());
            // A broken error page or a redirect loop still reports the final status.
            if err != FetchError::Cancelled {
                if let Some(status) = head.status.filter(|s| !(200..300).contains(s)) {
                    return Err(FetchError::Http { status });
                }
            }
            return Err(err);
        }

        let status = easy
            .response_code()
            .map_err(|e| fetch_error_from_curl(&e, true))?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Http { status });
        }
        sink.finish(&head)
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, task: &DownloadTask, ctx: &FetchContext<'_>) -> DownloadOutcome {
        tracing::debug!(url = %task.url, index = task.sequence_index, "requesting");
        match self.transfer(task, ctx) {
            Ok((path, bytes)) => {
                tracing::debug!(url = %task.url, bytes, "saved {}", path.display());
                DownloadOutcome::success(task.clone(), path, bytes)
            }
            Err(FetchError::Cancelled) => {
                tracing::debug!(url = %task.url, "aborted by cancellation");
                DownloadOutcome::skipped(task.clone())
            }
            Err(e) => DownloadOutcome::failed(task.clone(), e),
        }
    }
}

/// Only absolute http(s) URLs are fetched.
fn validate_url(raw: &str) -> Result<(), FetchError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| FetchError::Connection(format!("invalid URL {:?}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FetchError::Connection(format!(
            "unsupported URL scheme {:?} in {:?}",
            other, raw
        ))),
    }
}
