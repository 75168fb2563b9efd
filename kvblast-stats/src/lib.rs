#![warn(missing_docs)]
//! kvblast Statistical Engine
//!
//! Reduces the result collection of one run into global and per-kind
//! aggregates:
//! - total operation count and summed latency
//! - mean latency, global and per operation kind
//! - throughput as operations per second of summed latency

mod summary;

pub use summary::{KindStats, RunSummary, SummaryError, summarize};
