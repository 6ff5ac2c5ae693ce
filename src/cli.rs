//! Command-line interface definitions for helmscan.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Scan the container images referenced by a Helm chart with Trivy.
///
/// The chart is rendered with `helm template`, every unique `image:`
/// reference is collected, and each image is scanned by a throwaway
/// Trivy container sharing one vulnerability-database cache.
#[derive(Parser, Debug)]
#[command(name = "helmscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan Helm chart images for vulnerabilities", long_about = None)]
pub struct Args {
    /// Chart to scan (path to an unpacked chart or a repo/chart reference)
    #[arg(value_name = "CHART")]
    pub chart: String,

    /// Output format for scan results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Enable debug logging (also passed through to Trivy)
    #[arg(short, long)]
    pub debug: bool,

    /// Don't pull the scanner image before scanning
    #[arg(long)]
    pub no_pull: bool,

    /// Persistent cache directory for the vulnerability database
    ///
    /// By default a temporary directory is created and removed when the
    /// run finishes. A directory given here is created if missing and
    /// left in place, so later runs skip the database download.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Scanner image to run
    #[arg(long, value_name = "IMAGE", default_value = "aquasec/trivy:latest")]
    pub trivy_image: String,

    /// Helm executable used to render the chart
    #[arg(long, value_name = "BIN", default_value = "helm")]
    pub helm_bin: String,

    /// Extra arguments passed through to Trivy (after `--`)
    #[arg(last = true, value_name = "TRIVY_ARGS")]
    pub trivy_args: Vec<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable scanner output, printed per image
    Plain,
    /// Trivy JSON output, merged into a single array
    Json,
}

impl OutputFormat {
    /// Whether this format asks Trivy for JSON reports.
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chart_and_defaults() {
        let args = Args::parse_from(["helmscan", "stable/nginx"]);
        assert_eq!(args.chart, "stable/nginx");
        assert_eq!(args.output, OutputFormat::Plain);
        assert!(!args.debug);
        assert!(!args.no_pull);
        assert_eq!(args.trivy_image, "aquasec/trivy:latest");
        assert_eq!(args.helm_bin, "helm");
        assert!(args.trivy_args.is_empty());
    }

    #[test]
    fn parses_passthrough_args() {
        let args = Args::parse_from([
            "helmscan",
            "--output",
            "json",
            "./mychart",
            "--",
            "--severity",
            "HIGH,CRITICAL",
        ]);
        assert!(args.output.is_json());
        assert_eq!(args.trivy_args, vec!["--severity", "HIGH,CRITICAL"]);
    }

    #[test]
    fn missing_chart_is_an_error() {
        assert!(Args::try_parse_from(["helmscan"]).is_err());
    }
}
