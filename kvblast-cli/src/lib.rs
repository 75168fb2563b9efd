#![warn(missing_docs)]
//! kvblast CLI Library
//!
//! Wires configuration, the worker pool, aggregation, and the result sink
//! into the `kvblast` binary.
//!
//! ## Pipeline Overview
//!
//! ```text
//! kvblast.toml + CLI flags
//!        │
//!        ▼
//! ┌─────────────┐
//! │   runner    │  Worker pool: generate → invoke, per-worker buffers
//! └──────┬──────┘
//!        │  join barrier
//!        ▼
//! ┌─────────────┐
//! │ aggregation │  Global and per-kind statistics
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Console block + append-only CSV log
//! └─────────────┘
//! ```

mod config;
mod runner;

pub use config::{
    ConfigError, KvblastConfig, MAX_THREADS, OutputConfig, RunSection, TargetConfig,
    WorkloadSection,
};
pub use runner::{OpFailure, RunError, RunOptions, RunOutcome, execute_run};

use anyhow::Context;
use clap::{Parser, Subcommand};
use kvblast_core::{CancelToken, ProcessInvoker, install_sigint_handler};
use kvblast_report::{append_summary, format_summary};
use kvblast_stats::{SummaryError, summarize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// kvblast CLI arguments
#[derive(Parser, Debug)]
#[command(name = "kvblast")]
#[command(
    author,
    version,
    about = "kvblast - load harness for key/value and sorted-set stores"
)]
pub struct Cli {
    /// Optional subcommand; defaults to running the workload
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the client binary under test
    #[arg(long)]
    pub client: Option<PathBuf>,

    /// Number of worker threads
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Operations executed by each worker
    #[arg(long, short = 'n')]
    pub ops_per_thread: Option<u64>,

    /// Upper bound for random keys and member names
    #[arg(long)]
    pub key_range: Option<u32>,

    /// Upper bound for random scores
    #[arg(long)]
    pub score_range: Option<u32>,

    /// Base seed for per-worker random streams
    #[arg(long)]
    pub seed: Option<u64>,

    /// Results log path (CSV, appended across runs)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Explicit config file (skips kvblast.toml discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the workload (default)
    Run,
    /// Write a commented default kvblast.toml to the current directory
    Init,
}

/// Run the kvblast CLI. This is the entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the kvblast CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("kvblast=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("kvblast=info")
            .init();
    }

    if let Some(Commands::Init) = cli.command {
        return init_config();
    }

    let config = load_config(&cli)?;
    let config = apply_overrides(config, &cli);
    config.validate()?;

    run_load(&config)
}

fn load_config(cli: &Cli) -> anyhow::Result<KvblastConfig> {
    match &cli.config {
        Some(path) => KvblastConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(KvblastConfig::discover().unwrap_or_default()),
    }
}

/// CLI flags override config file values.
fn apply_overrides(mut config: KvblastConfig, cli: &Cli) -> KvblastConfig {
    if let Some(client) = &cli.client {
        config.target.client = client.display().to_string();
    }
    if let Some(threads) = cli.threads {
        config.run.threads = threads;
    }
    if let Some(ops) = cli.ops_per_thread {
        config.run.ops_per_thread = ops;
    }
    if let Some(range) = cli.key_range {
        config.workload.key_range = range;
    }
    if let Some(range) = cli.score_range {
        config.workload.score_range = range;
    }
    if cli.seed.is_some() {
        config.run.seed = cli.seed;
    }
    if let Some(output) = &cli.output {
        config.output.results_file = output.display().to_string();
    }
    config
}

fn init_config() -> anyhow::Result<()> {
    let path = PathBuf::from("kvblast.toml");
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing {}", path.display());
    }
    std::fs::write(&path, KvblastConfig::default_toml())?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_load(config: &KvblastConfig) -> anyhow::Result<()> {
    let invoker = ProcessInvoker::new(&config.target.client);
    let spec = config.workload_spec();
    let opts = RunOptions {
        threads: config.run.threads,
        ops_per_thread: config.run.ops_per_thread,
        seed: config.run.seed,
    };

    install_sigint_handler();
    let cancel = CancelToken::new();

    info!(
        client = %config.target.client,
        threads = opts.threads,
        ops_per_thread = opts.ops_per_thread,
        "starting run"
    );

    let outcome = execute_run(&invoker, &spec, &opts, &cancel)?;

    info!(
        results = outcome.results.len(),
        failures = outcome.failures.len(),
        elapsed_secs = outcome.elapsed.as_secs_f64(),
        "run complete"
    );
    if outcome.cancelled {
        warn!(
            collected = outcome.results.len(),
            "run cancelled; reporting partial results"
        );
    }
    if !outcome.failures.is_empty() {
        eprintln!(
            "{} operation(s) failed to spawn the client; first failure: {}",
            outcome.failures.len(),
            outcome.failures[0].error
        );
    }

    match summarize(&outcome.results, opts.threads, opts.ops_per_thread) {
        Ok(summary) => {
            print!("{}", format_summary(&summary));

            let results_file = Path::new(&config.output.results_file);
            append_summary(results_file, &summary).context("failed to persist run summary")?;
            info!(
                path = %config.output.results_file,
                kinds = summary.per_kind.len(),
                "results appended"
            );
            Ok(())
        }
        Err(SummaryError::Empty) => {
            eprintln!("No operations completed; nothing to aggregate.");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config_values() {
        let cli = Cli::parse_from([
            "kvblast",
            "--client",
            "/usr/bin/store-client",
            "--threads",
            "4",
            "--ops-per-thread",
            "25",
            "--seed",
            "42",
            "-o",
            "out.csv",
        ]);

        let config = apply_overrides(KvblastConfig::default(), &cli);

        assert_eq!(config.target.client, "/usr/bin/store-client");
        assert_eq!(config.run.threads, 4);
        assert_eq!(config.run.ops_per_thread, 25);
        assert_eq!(config.run.seed, Some(42));
        assert_eq!(config.output.results_file, "out.csv");
        // Untouched values keep their defaults.
        assert_eq!(config.workload.key_range, 100);
    }

    #[test]
    fn absent_flags_leave_config_alone() {
        let cli = Cli::parse_from(["kvblast"]);

        let mut base = KvblastConfig::default();
        base.run.seed = Some(7);
        base.run.threads = 3;

        let config = apply_overrides(base, &cli);
        assert_eq!(config.run.seed, Some(7));
        assert_eq!(config.run.threads, 3);
    }
}
