#![warn(missing_docs)]
//! kvblast Report - Reporting and Persistence
//!
//! Two consumers of a finished [`RunSummary`](kvblast_stats::RunSummary):
//! - a human-readable console block
//! - a durable, append-only CSV log (one row per operation kind per run)

mod csv;
mod human;

pub use csv::{CSV_HEADER, SinkError, append_summary};
pub use human::format_summary;
