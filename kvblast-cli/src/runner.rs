//! Concurrency Coordinator
//!
//! Owns the fixed worker pool for one run. Each worker draws operations
//! from its own generator and invokes the client sequentially until its
//! quota is done; all parallelism is across workers. Results live in
//! per-worker buffers that are merged only after the pool joins, so no
//! collection is shared while the run is hot.

use indicatif::{ProgressBar, ProgressStyle};
use kvblast_core::{
    CancelToken, ClientInvoker, ExecutionResult, InvokeError, OpKind, WorkloadGenerator,
    WorkloadSpec,
};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed shape of one run. Quotas never rebalance after start.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Number of workers.
    pub threads: usize,
    /// Operations each worker executes.
    pub ops_per_thread: u64,
    /// Base seed; worker `i` derives its stream from `seed + i`. `None`
    /// seeds every worker from entropy.
    pub seed: Option<u64>,
}

/// A spawn failure, attributed to the kind that was being attempted.
///
/// Kept apart from [`ExecutionResult`] so the aggregator never averages a
/// zero-latency ghost entry.
#[derive(Debug)]
pub struct OpFailure {
    /// The kind whose invocation failed.
    pub kind: OpKind,
    /// Why the client never ran.
    pub error: InvokeError,
}

/// Everything the workers produced, merged at the join barrier.
#[derive(Debug)]
pub struct RunOutcome {
    /// Completed operations, in whatever interleaving the merge produced.
    pub results: Vec<ExecutionResult>,
    /// Operations whose client process never ran.
    pub failures: Vec<OpFailure>,
    /// Wall clock of the whole run, pool start to join.
    pub elapsed: Duration,
    /// True when the run stopped early via the cancel token.
    pub cancelled: bool,
}

/// The run never started.
#[derive(Debug, Error)]
pub enum RunError {
    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

struct WorkerOutput {
    results: Vec<ExecutionResult>,
    failures: Vec<OpFailure>,
    cancelled: bool,
}

/// Run the full workload across the worker pool, blocking until every
/// worker finished its quota or observed cancellation.
pub fn execute_run<I: ClientInvoker>(
    invoker: &I,
    spec: &WorkloadSpec,
    opts: &RunOptions,
    cancel: &CancelToken,
) -> Result<RunOutcome, RunError> {
    let pool = ThreadPoolBuilder::new().num_threads(opts.threads).build()?;

    let total_ops = opts.threads as u64 * opts.ops_per_thread;
    let progress = ProgressBar::new(total_ops);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let outputs: Vec<WorkerOutput> = pool.install(|| {
        (0..opts.threads)
            .into_par_iter()
            .map(|worker| {
                let generator = match opts.seed {
                    Some(base) => WorkloadGenerator::seeded(
                        spec.clone(),
                        base.wrapping_add(worker as u64),
                    ),
                    None => WorkloadGenerator::from_entropy(spec.clone()),
                };
                run_worker(
                    worker,
                    generator,
                    invoker,
                    opts.ops_per_thread,
                    cancel,
                    &progress,
                )
            })
            .collect()
    });
    let elapsed = start.elapsed();
    progress.finish_and_clear();

    // The collect above is the join barrier: from here on the collection is
    // read-only.
    let mut outcome = RunOutcome {
        results: Vec::with_capacity(total_ops as usize),
        failures: Vec::new(),
        elapsed,
        cancelled: false,
    };
    for output in outputs {
        outcome.results.extend(output.results);
        outcome.failures.extend(output.failures);
        outcome.cancelled |= output.cancelled;
    }
    Ok(outcome)
}

/// One worker: a tight generate-then-invoke loop over a fixed quota, with a
/// cancellation check between operations.
fn run_worker<I: ClientInvoker>(
    worker: usize,
    mut generator: WorkloadGenerator,
    invoker: &I,
    quota: u64,
    cancel: &CancelToken,
    progress: &ProgressBar,
) -> WorkerOutput {
    let mut output = WorkerOutput {
        results: Vec::with_capacity(quota as usize),
        failures: Vec::new(),
        cancelled: false,
    };

    debug!(worker, quota, "worker started");
    for _ in 0..quota {
        if cancel.is_cancelled() {
            output.cancelled = true;
            break;
        }
        let op = generator.next_op();
        match invoker.invoke(&op) {
            Ok(result) => output.results.push(result),
            Err(error) => {
                warn!(worker, kind = %op.kind, %error, "operation failed to spawn");
                output.failures.push(OpFailure {
                    kind: op.kind,
                    error,
                });
            }
        }
        progress.inc(1);
    }
    debug!(
        worker,
        results = output.results.len(),
        failures = output.failures.len(),
        cancelled = output.cancelled,
        "worker finished"
    );

    output
}
