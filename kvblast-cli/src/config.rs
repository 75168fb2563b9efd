//! Configuration loading from kvblast.toml
//!
//! The harness is configured through a `kvblast.toml` discovered by walking
//! up from the current directory; CLI flags override individual values.
//! Every field has a default, so a missing file means "the stock workload".

use kvblast_core::WorkloadSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Upper bound on the worker pool. Every worker blocks on a child process,
/// so an unbounded pool exhausts process slots and file descriptors.
pub const MAX_THREADS: usize = 256;

/// kvblast configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KvblastConfig {
    /// The client binary under test
    #[serde(default)]
    pub target: TargetConfig,
    /// Run shape: workers and quotas
    #[serde(default)]
    pub run: RunSection,
    /// Workload value ranges
    #[serde(default)]
    pub workload: WorkloadSection,
    /// Result persistence
    #[serde(default)]
    pub output: OutputConfig,
}

/// The client binary under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Path to the client executable
    #[serde(default = "default_client")]
    pub client: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            client: default_client(),
        }
    }
}

fn default_client() -> String {
    "./client".to_string()
}

/// Run shape: how many workers, how much work each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    /// Number of worker threads
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Operations each worker executes
    #[serde(default = "default_ops_per_thread")]
    pub ops_per_thread: u64,
    /// Base seed for per-worker random streams; omit for entropy seeding
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            ops_per_thread: default_ops_per_thread(),
            seed: None,
        }
    }
}

fn default_threads() -> usize {
    10
}
fn default_ops_per_thread() -> u64 {
    1000
}

/// Workload value ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSection {
    /// Keys and member names are drawn from 1..=key_range
    #[serde(default = "default_key_range")]
    pub key_range: u32,
    /// Scores are drawn from 1..=score_range
    #[serde(default = "default_score_range")]
    pub score_range: u32,
    /// Minimum PEXPIRE TTL in milliseconds
    #[serde(default = "default_ttl_min_ms")]
    pub ttl_min_ms: u64,
    /// Maximum PEXPIRE TTL in milliseconds
    #[serde(default = "default_ttl_max_ms")]
    pub ttl_max_ms: u64,
    /// Fixed ZQUERY limit; the store requires an even value
    #[serde(default = "default_query_limit")]
    pub query_limit: u32,
}

impl Default for WorkloadSection {
    fn default() -> Self {
        Self {
            key_range: default_key_range(),
            score_range: default_score_range(),
            ttl_min_ms: default_ttl_min_ms(),
            ttl_max_ms: default_ttl_max_ms(),
            query_limit: default_query_limit(),
        }
    }
}

fn default_key_range() -> u32 {
    100
}
fn default_score_range() -> u32 {
    100
}
fn default_ttl_min_ms() -> u64 {
    1000
}
fn default_ttl_max_ms() -> u64 {
    5000
}
fn default_query_limit() -> u32 {
    4
}

/// Result persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Results log path; rows accumulate across runs
    #[serde(default = "default_results_file")]
    pub results_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_file: default_results_file(),
        }
    }
}

fn default_results_file() -> String {
    "performance_results.csv".to_string()
}

/// A configuration value that cannot drive a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Worker count outside the supported pool bounds.
    #[error("threads must be between 1 and {MAX_THREADS}, got {0}")]
    ThreadsOutOfRange(usize),
    /// A run of zero operations has nothing to measure.
    #[error("ops_per_thread must be at least 1")]
    NoOperations,
    /// Key or score draws need a nonempty range.
    #[error("key_range and score_range must be at least 1")]
    EmptyValueRange,
    /// TTL bounds are inverted.
    #[error("ttl_min_ms {0} exceeds ttl_max_ms {1}")]
    TtlRangeInverted(u64, u64),
    /// The store rejects odd ZQUERY limits.
    #[error("query_limit must be a nonzero even number, got {0}")]
    BadQueryLimit(u32),
}

impl KvblastConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("kvblast.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Reject values that cannot drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.threads == 0 || self.run.threads > MAX_THREADS {
            return Err(ConfigError::ThreadsOutOfRange(self.run.threads));
        }
        if self.run.ops_per_thread == 0 {
            return Err(ConfigError::NoOperations);
        }
        if self.workload.key_range == 0 || self.workload.score_range == 0 {
            return Err(ConfigError::EmptyValueRange);
        }
        if self.workload.ttl_min_ms > self.workload.ttl_max_ms {
            return Err(ConfigError::TtlRangeInverted(
                self.workload.ttl_min_ms,
                self.workload.ttl_max_ms,
            ));
        }
        if self.workload.query_limit == 0 || self.workload.query_limit % 2 != 0 {
            return Err(ConfigError::BadQueryLimit(self.workload.query_limit));
        }
        Ok(())
    }

    /// The workload ranges as the generator consumes them.
    pub fn workload_spec(&self) -> WorkloadSpec {
        WorkloadSpec {
            key_range: self.workload.key_range,
            score_range: self.workload.score_range,
            ttl_ms: (self.workload.ttl_min_ms, self.workload.ttl_max_ms),
            query_limit: self.workload.query_limit,
        }
    }

    /// Generate a default configuration as a TOML string.
    pub fn default_toml() -> String {
        r#"# kvblast Configuration

[target]
# Path to the client binary under test
client = "./client"

[run]
# Number of worker threads (each blocks on one client process at a time)
threads = 10
# Operations executed by each worker
ops_per_thread = 1000
# Base seed for per-worker random streams (uncomment for reproducible runs)
# seed = 42

[workload]
# Keys and member names are drawn from 1..=key_range
key_range = 100
# Scores are drawn from 1..=score_range
score_range = 100
# PEXPIRE TTL bounds in milliseconds
ttl_min_ms = 1000
ttl_max_ms = 5000
# Fixed ZQUERY limit; must be even
query_limit = 4

[output]
# Results log; one row per command kind per run, appended
results_file = "performance_results.csv"
"#
        .to_string()
    }
}
