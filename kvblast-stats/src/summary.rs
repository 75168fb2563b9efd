//! Run Aggregation
//!
//! Reduces a completed result collection into a [`RunSummary`]. Aggregation
//! is a pure fold over immutable results: re-running it over the same
//! collection yields identical statistics.

use chrono::{DateTime, Local};
use kvblast_core::{ExecutionResult, OpKind};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Aggregation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    /// Zero operations completed; the averages are undefined. The caller
    /// reports this as a degenerate run instead of dividing by zero.
    #[error("no completed operations to aggregate")]
    Empty,
}

/// Per-kind aggregate: completed operation count and summed latency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStats {
    /// Operations of this kind that completed.
    pub count: u64,
    /// Sum of their latencies.
    pub total_latency: Duration,
}

impl KindStats {
    /// Mean latency for this kind.
    pub fn avg_latency(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            mean_duration(self.total_latency, self.count)
        }
    }
}

/// Aggregated outcome of one run. Immutable after construction.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Local time the summary was built.
    pub timestamp: DateTime<Local>,
    /// Worker count the run was configured with.
    pub threads: usize,
    /// Per-worker operation quota the run was configured with.
    pub ops_per_thread: u64,
    /// Operations that completed across all workers.
    pub total_ops: u64,
    /// Sum of all per-operation latencies.
    pub total_latency: Duration,
    /// `total_latency / total_ops`.
    pub avg_latency: Duration,
    /// Operations per second of summed per-operation latency. This measures
    /// aggregate per-operation cost, not the wall-clock rate of the
    /// concurrent run.
    pub throughput: f64,
    /// Per-kind aggregates, keyed in stable kind order.
    pub per_kind: BTreeMap<OpKind, KindStats>,
}

fn mean_duration(total: Duration, count: u64) -> Duration {
    Duration::from_nanos((total.as_nanos() / u128::from(count)) as u64)
}

/// Reduce a completed result collection into a [`RunSummary`].
///
/// `threads` and `ops_per_thread` are carried through for reporting; when no
/// operation failed to spawn and the run was not cancelled,
/// `total_ops == threads * ops_per_thread`.
pub fn summarize(
    results: &[ExecutionResult],
    threads: usize,
    ops_per_thread: u64,
) -> Result<RunSummary, SummaryError> {
    if results.is_empty() {
        return Err(SummaryError::Empty);
    }

    let mut per_kind: BTreeMap<OpKind, KindStats> = BTreeMap::new();
    let mut total_latency = Duration::ZERO;
    for result in results {
        total_latency += result.latency;
        let entry = per_kind.entry(result.kind).or_default();
        entry.count += 1;
        entry.total_latency += result.latency;
    }

    let total_ops = results.len() as u64;
    let total_secs = total_latency.as_secs_f64();
    let throughput = if total_secs > 0.0 {
        total_ops as f64 / total_secs
    } else {
        0.0
    };

    Ok(RunSummary {
        timestamp: Local::now(),
        threads,
        ops_per_thread,
        total_ops,
        total_latency,
        avg_latency: mean_duration(total_latency, total_ops),
        throughput,
        per_kind,
    })
}
