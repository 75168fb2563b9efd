//! Integration tests for kvblast
//!
//! These drive the real process invoker and the CSV sink end to end,
//! using `/bin/echo` as a stand-in client.

use kvblast_cli::{RunOptions, execute_run};
use kvblast_core::{CancelToken, ProcessInvoker, WorkloadSpec};
use kvblast_report::{CSV_HEADER, append_summary, format_summary};
use kvblast_stats::summarize;

fn opts(threads: usize, ops: u64) -> RunOptions {
    RunOptions {
        threads,
        ops_per_thread: ops,
        seed: Some(7),
    }
}

#[cfg(unix)]
#[test]
fn echo_client_round_trip() {
    let invoker = ProcessInvoker::new("/bin/echo");
    let outcome = execute_run(
        &invoker,
        &WorkloadSpec::default(),
        &opts(2, 3),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(outcome.results.len(), 6);
    assert!(outcome.failures.is_empty());
    assert!(!outcome.cancelled);
    // echo prints the command line back; the invoker trims the newline.
    assert!(outcome.results.iter().all(|r| !r.stdout.is_empty()));

    let summary = summarize(&outcome.results, 2, 3).unwrap();
    assert_eq!(summary.total_ops, 6);
    assert_eq!(
        summary.per_kind.values().map(|s| s.count).sum::<u64>(),
        summary.total_ops
    );
    assert!(summary.throughput > 0.0);

    let rendered = format_summary(&summary);
    assert!(rendered.contains("Total Operations: 6"));
    assert!(rendered.contains("operations/second"));
}

#[test]
fn missing_client_yields_spawn_failures_not_results() {
    let invoker = ProcessInvoker::new("/nonexistent/kvblast-test-client");
    let outcome = execute_run(
        &invoker,
        &WorkloadSpec::default(),
        &opts(2, 3),
        &CancelToken::new(),
    )
    .unwrap();

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.failures.len(), 6);
    assert!(summarize(&outcome.results, 2, 3).is_err());
}

#[cfg(unix)]
#[test]
fn results_log_accumulates_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("performance_results.csv");
    let invoker = ProcessInvoker::new("/bin/echo");

    for _ in 0..2 {
        let outcome = execute_run(
            &invoker,
            &WorkloadSpec::default(),
            &opts(2, 3),
            &CancelToken::new(),
        )
        .unwrap();
        let summary = summarize(&outcome.results, 2, 3).unwrap();
        append_summary(&path, &summary).unwrap();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines[0], CSV_HEADER);
    let headers = lines.iter().filter(|l| l.starts_with("Timestamp")).count();
    assert_eq!(headers, 1, "header written exactly once across runs");

    // One data row per kind observed per run, all well-formed.
    for row in &lines[1..] {
        assert_eq!(row.split(',').count(), 9);
    }
    assert!(lines.len() > 2);
}
