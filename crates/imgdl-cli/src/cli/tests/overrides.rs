//! Config overrides and exit status mapping.

use super::parse;
use crate::cli::{exit_code, EXIT_INCOMPLETE, EXIT_OK};
use imgdl_core::config::ImgdlConfig;
use imgdl_core::report::ReportSummary;

#[test]
fn flags_override_config() {
    let cli = parse(&[
        "imgdl",
        "urls.txt",
        "-n",
        "3",
        "--connect-timeout",
        "2",
        "--read-timeout",
        "9",
        "--any-type",
    ]);
    let mut cfg = ImgdlConfig::default();
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg.concurrency, 3);
    assert_eq!(cfg.connect_timeout_secs, 2);
    assert_eq!(cfg.read_timeout_secs, 9);
    assert!(!cfg.images_only);
}

#[test]
fn absent_flags_keep_config() {
    let cli = parse(&["imgdl", "urls.txt"]);
    let mut cfg = ImgdlConfig {
        concurrency: 5,
        read_timeout_secs: 60,
        ..ImgdlConfig::default()
    };
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg.concurrency, 5);
    assert_eq!(cfg.read_timeout_secs, 60);
    assert!(cfg.images_only);
}

#[test]
fn worker_override_is_still_capped() {
    let cli = parse(&["imgdl", "urls.txt", "-n", "1000"]);
    let mut cfg = ImgdlConfig::default();
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg.effective_concurrency(), cfg.max_concurrency);
}

#[test]
fn exit_status_reflects_summary() {
    let clean = ReportSummary {
        total: 2,
        succeeded: 2,
        ..ReportSummary::default()
    };
    assert_eq!(exit_code(&clean), EXIT_OK);

    let skipped = ReportSummary {
        total: 2,
        succeeded: 1,
        skipped: 1,
        ..ReportSummary::default()
    };
    assert_eq!(exit_code(&skipped), EXIT_INCOMPLETE);

    let failed = ReportSummary {
        total: 1,
        failed: 1,
        ..ReportSummary::default()
    };
    assert_eq!(exit_code(&failed), EXIT_INCOMPLETE);
}
