//! Process Invocation
//!
//! Executes one operation as a synchronous call to the external client
//! binary, timing the full round trip and capturing both output streams.

use crate::op::{OpKind, OperationDescriptor};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Failure local to the harness: the client process never ran.
///
/// Application-level errors from the target are not represented here. A
/// client that runs and exits nonzero still yields an [`ExecutionResult`];
/// its complaint is whatever it wrote to stderr.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The executable could not be spawned at all.
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        /// The command line that failed, for diagnostics.
        command: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one completed client invocation. Immutable after creation.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// The kind of operation that ran.
    pub kind: OpKind,
    /// Wall clock from before spawn until the process exited and both
    /// output streams were drained.
    pub latency: Duration,
    /// Captured standard output, UTF-8 (lossy), trimmed.
    pub stdout: String,
    /// Captured standard error, UTF-8 (lossy), trimmed.
    pub stderr: String,
}

/// The seam between the coordinator and the client under test.
///
/// Implementations are called concurrently from every worker thread.
pub trait ClientInvoker: Sync {
    /// Execute one operation, blocking until the client terminates.
    ///
    /// No retries, no timeout: a hung client blocks its worker.
    fn invoke(&self, op: &OperationDescriptor) -> Result<ExecutionResult, InvokeError>;
}

/// Invoker that shells out to the real client binary as
/// `<client> <kind> <args...>`.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    client: PathBuf,
}

impl ProcessInvoker {
    /// Invoker for the client binary at `client`.
    pub fn new(client: impl Into<PathBuf>) -> Self {
        Self {
            client: client.into(),
        }
    }

    /// Path of the client binary this invoker runs.
    pub fn client(&self) -> &Path {
        &self.client
    }
}

impl ClientInvoker for ProcessInvoker {
    fn invoke(&self, op: &OperationDescriptor) -> Result<ExecutionResult, InvokeError> {
        let start = Instant::now();
        // output() waits for exit and drains both pipes, so the stop stamp
        // covers the full round trip.
        let output = Command::new(&self.client)
            .arg(op.kind.as_str())
            .args(&op.args)
            .output()
            .map_err(|source| InvokeError::Spawn {
                command: format!("{} {}", self.client.display(), op.kind),
                source,
            })?;
        let latency = start.elapsed();

        Ok(ExecutionResult {
            kind: op.kind,
            latency,
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
