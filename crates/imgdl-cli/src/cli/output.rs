//! Progress line and final report printing.

use anyhow::Result;
use imgdl_core::report::ReportSummary;
use imgdl_core::scheduler::ProgressStats;
use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Consume progress snapshots until the sender is dropped. When `show` is
/// false the snapshots are drained silently (e.g. with `--json`).
pub fn spawn_progress_printer(
    rx: mpsc::Receiver<ProgressStats>,
    show: bool,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut last_print: Option<Instant> = None;
        let mut printed = false;
        for stats in rx {
            if !show {
                continue;
            }
            let due = last_print.map_or(true, |t| t.elapsed() >= PROGRESS_INTERVAL);
            if due || stats.remaining() == 0 {
                eprint!("\r{}", progress_line(&stats));
                let _ = io::stderr().flush();
                last_print = Some(Instant::now());
                printed = true;
            }
        }
        if printed {
            eprintln!();
        }
    })
}

fn progress_line(stats: &ProgressStats) -> String {
    format!(
        "  {}/{} ({:.0}%)  ok {}  failed {}  skipped {}  {:.1} MiB  ",
        stats.completed,
        stats.total,
        stats.fraction() * 100.0,
        stats.succeeded,
        stats.failed,
        stats.skipped,
        stats.bytes_written as f64 / 1_048_576.0
    )
}

pub fn print_summary(summary: &ReportSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_shows_counts() {
        let stats = ProgressStats {
            completed: 3,
            total: 4,
            succeeded: 2,
            failed: 1,
            skipped: 0,
            bytes_written: 2 * 1_048_576,
        };
        let line = progress_line(&stats);
        assert!(line.contains("3/4 (75%)"));
        assert!(line.contains("failed 1"));
        assert!(line.contains("2.0 MiB"));
    }

    #[test]
    fn printer_drains_until_sender_dropped() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_progress_printer(rx, false);
        tx.send(ProgressStats::default()).unwrap();
        drop(tx);
        handle.join().unwrap();
    }
}
