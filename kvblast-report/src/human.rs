//! Console Report
//!
//! Terminal output for one run: the global figures, then one block per
//! operation kind in stable order.

use kvblast_stats::RunSummary;

/// Format a run summary for terminal display.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("Total Operations: {}\n", summary.total_ops));
    output.push_str(&format!(
        "Average Latency: {:.6} seconds\n",
        summary.avg_latency.as_secs_f64()
    ));
    output.push_str(&format!(
        "Throughput: {:.2} operations/second\n\n",
        summary.throughput
    ));

    for (kind, stats) in &summary.per_kind {
        output.push_str(&format!("Command: {}\n", kind));
        output.push_str(&format!("  Operations: {}\n", stats.count));
        output.push_str(&format!(
            "  Average Latency: {:.6} seconds\n\n",
            stats.avg_latency().as_secs_f64()
        ));
    }

    output
}
