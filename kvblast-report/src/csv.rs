//! Durable Results Log
//!
//! Appends one row per operation kind to a CSV file. The header is written
//! exactly once over the file's lifetime: only when the file is missing or
//! empty. Existing content is never rewritten or truncated, so rows from
//! successive runs accumulate.

use kvblast_stats::RunSummary;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column order of the results log.
pub const CSV_HEADER: &str = "Timestamp,Total Threads,Operations per Thread,Total Operations,Average Latency,Throughput,Command,Command Count,Command Average Latency";

/// Persistence failure. Fatal for the sink step; the console report is
/// expected to have been produced before rows are appended.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The log file could not be opened or inspected.
    #[error("failed to open results log {path}: {source}")]
    Open {
        /// Path of the log file.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// Rows could not be appended.
    #[error("failed to append to results log {path}: {source}")]
    Write {
        /// Path of the log file.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Append one row per operation kind observed in `summary`.
///
/// All rows of a run are written in a single `write_all` so a run's rows
/// land contiguously.
pub fn append_summary(path: &Path, summary: &RunSummary) -> Result<(), SinkError> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let needs_header = file
        .metadata()
        .map(|m| m.len() == 0)
        .map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = String::new();
    if needs_header {
        rows.push_str(CSV_HEADER);
        rows.push('\n');
    }

    let timestamp = summary.timestamp.format("%Y-%m-%d %H:%M:%S");
    for (kind, stats) in &summary.per_kind {
        rows.push_str(&format!(
            "{},{},{},{},{:.6},{:.2},{},{},{:.6}\n",
            timestamp,
            summary.threads,
            summary.ops_per_thread,
            summary.total_ops,
            summary.avg_latency.as_secs_f64(),
            summary.throughput,
            kind,
            stats.count,
            stats.avg_latency().as_secs_f64(),
        ));
    }

    file.write_all(rows.as_bytes())
        .map_err(|source| SinkError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvblast_core::{ExecutionResult, OpKind};
    use kvblast_stats::summarize;
    use std::time::Duration;

    fn summary_of(kinds: &[OpKind]) -> RunSummary {
        let results: Vec<_> = kinds
            .iter()
            .map(|&kind| ExecutionResult {
                kind,
                latency: Duration::from_millis(10),
                stdout: String::new(),
                stderr: String::new(),
            })
            .collect();
        summarize(&results, 2, kinds.len() as u64 / 2).unwrap()
    }

    #[test]
    fn fresh_file_gets_header_and_one_row_per_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let summary = summary_of(&[OpKind::Get, OpKind::Set, OpKind::Get]);
        append_summary(&path, &summary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 1 + 2, "two distinct kinds observed");
    }

    #[test]
    fn header_appears_once_across_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        append_summary(&path, &summary_of(&[OpKind::Get, OpKind::Set])).unwrap();
        append_summary(&path, &summary_of(&[OpKind::Zadd, OpKind::Zadd])).unwrap();
        append_summary(&path, &summary_of(&[OpKind::Get, OpKind::Pttl])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let headers = content
            .lines()
            .filter(|line| line.starts_with("Timestamp"))
            .count();
        assert_eq!(headers, 1);

        // 2 + 1 + 2 distinct kinds across the three runs.
        assert_eq!(content.lines().count(), 1 + 5);
    }

    #[test]
    fn existing_content_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, format!("{}\nold,row\n", CSV_HEADER)).unwrap();

        append_summary(&path, &summary_of(&[OpKind::Del, OpKind::Del])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("old,row"));
        assert_eq!(
            content
                .lines()
                .filter(|line| line.starts_with("Timestamp"))
                .count(),
            1,
            "no second header on a non-empty file"
        );
    }

    #[test]
    fn rows_carry_the_exact_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        append_summary(&path, &summary_of(&[OpKind::Zscore, OpKind::Zscore])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[1], "2"); // threads
        assert_eq!(fields[3], "2"); // total ops
        assert_eq!(fields[4], "0.010000"); // average latency
        assert_eq!(fields[6], "zscore");
        assert_eq!(fields[7], "2");
        assert_eq!(fields[8], "0.010000");
    }

    #[test]
    fn unopenable_path_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("results.csv");

        let err = append_summary(&path, &summary_of(&[OpKind::Get, OpKind::Get])).unwrap_err();
        assert!(matches!(err, SinkError::Open { .. }));
    }
}
