//! CLI for imgdl, the concurrent image batch downloader.

mod output;
mod url_list;

use anyhow::{Context, Result};
use clap::Parser;
use imgdl_core::config::{self, ImgdlConfig};
use imgdl_core::control::CancelToken;
use imgdl_core::report::ReportSummary;
use imgdl_core::scheduler::{self, ProgressStats};
use std::path::PathBuf;
use std::sync::mpsc;

pub use url_list::load_url_list;

/// Exit status when every URL was downloaded.
pub const EXIT_OK: i32 = 0;
/// Exit status when at least one URL failed or was skipped.
pub const EXIT_INCOMPLETE: i32 = 2;

/// Download every image listed in FILE, concurrently.
#[derive(Debug, Parser)]
#[command(name = "imgdl", version)]
#[command(about = "imgdl: concurrent image batch downloader", long_about = None)]
pub struct Cli {
    /// Text file with one URL per line (blank lines and `#` comments ignored).
    pub file: PathBuf,

    /// Directory to save images into (created if missing). Defaults to the
    /// config `output_dir`, then the current directory.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Number of concurrent downloads (capped by `max_concurrency`).
    #[arg(short = 'n', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Seconds allowed for connecting to a server.
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Abort a transfer after this many seconds without data.
    #[arg(long, value_name = "SECS")]
    pub read_timeout: Option<u64>,

    /// Save responses whatever their Content-Type (default: images only).
    #[arg(long)]
    pub any_type: bool,

    /// Print the final report as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run the batch and return the process exit status.
    pub fn run(self) -> Result<i32> {
        let mut cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("could not load config, using defaults: {:#}", e);
                ImgdlConfig::default()
            }
        };
        self.apply_overrides(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);

        let urls = load_url_list(&self.file)?;
        if urls.is_empty() {
            println!("No URLs in {}.", self.file.display());
            return Ok(EXIT_OK);
        }
        let output_dir = self
            .out_dir
            .clone()
            .or_else(|| cfg.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let cancel = CancelToken::new();
        {
            let cancel = cancel.clone();
            ctrlc::set_handler(move || {
                tracing::warn!("received Ctrl+C, stopping");
                cancel.cancel();
            })
            .context("install Ctrl+C handler")?;
        }

        let (progress_tx, progress_rx) = mpsc::channel::<ProgressStats>();
        let printer = output::spawn_progress_printer(progress_rx, !self.json);
        let result = scheduler::run_batch(&urls, &output_dir, &cfg, &cancel, Some(&progress_tx));
        drop(progress_tx);
        let _ = printer.join();
        let result = result.context("cannot start downloads")?;

        if cancel.is_cancelled() {
            eprintln!("Interrupted: unfinished downloads were skipped.");
        }
        output::print_summary(&result.summary, self.json)?;
        Ok(exit_code(&result.summary))
    }

    /// CLI flags win over the config file.
    fn apply_overrides(&self, cfg: &mut ImgdlConfig) {
        if let Some(n) = self.workers {
            cfg.concurrency = n;
        }
        if let Some(secs) = self.connect_timeout {
            cfg.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.read_timeout {
            cfg.read_timeout_secs = secs;
        }
        if self.any_type {
            cfg.images_only = false;
        }
    }
}

pub fn exit_code(summary: &ReportSummary) -> i32 {
    if summary.is_clean() {
        EXIT_OK
    } else {
        EXIT_INCOMPLETE
    }
}

#[cfg(test)]
mod tests;
