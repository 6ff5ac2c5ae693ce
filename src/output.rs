//! Output aggregation and terminal messages.
//!
//! Scan results are passed through as the scanner produced them; the
//! only transformation is the JSON-mode merge of per-image reports.

use console::style;
use tracing::warn;

/// Merge per-image JSON fragments into one report.
///
/// Trivy emits one JSON array per scanned image. Concatenating those
/// and replacing every `][` seam with `,` joins them into a single
/// array. The replacement is textual, not structural, so a report that
/// happens to contain a literal `][` inside a string value would be
/// corrupted; [`warn_if_invalid_json`] surfaces that case.
pub fn merge_json_outputs(fragments: &[String]) -> String {
    fragments.concat().replace("][", ",")
}

/// Log a warning if the merged report is not parseable JSON.
///
/// Stdout still carries the merged text unchanged either way, keeping
/// the output byte-compatible with earlier releases.
pub fn warn_if_invalid_json(merged: &str) {
    if serde_json::from_str::<serde_json::Value>(merged).is_err() {
        warn!("merged scanner output is not valid JSON; a report may contain a literal ']['");
    }
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("error:").red().bold(), msg);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("warning:").yellow().bold(), msg);
}

/// Print an informational message to stderr.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("info:").cyan().bold(), msg);
}
