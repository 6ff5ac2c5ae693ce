//! # helmscan - Helm chart image vulnerability scanning
//!
//! helmscan renders a Helm chart, collects every container image it
//! references, and scans each one with [Trivy](https://trivy.dev)
//! running in a throwaway Docker container.
//!
//! ## Pipeline
//!
//! 1. `helm template <chart>` renders the chart to manifest text
//! 2. every unique `image:` line becomes a scan target, in first-seen
//!    order
//! 3. one Trivy container per image, sharing a host cache directory so
//!    the vulnerability database is fetched once
//! 4. results are printed per image, or merged into a single JSON
//!    array in JSON mode
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use helmscan::scanner::{scan_chart, ScanOptions, TrivyScanner};
//! use helmscan::cache::CacheDir;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let opts = ScanOptions {
//!         json: false,
//!         debug: false,
//!         trivy_image: "aquasec/trivy:latest".to_string(),
//!         helm_bin: "helm".to_string(),
//!         trivy_args: vec![],
//!     };
//!     let cache = CacheDir::new(None)?;
//!     let scanner = TrivyScanner::from_env()?;
//!     scan_chart(&scanner, "stable/nginx", &opts, cache.path()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`helm`] - chart rendering via the helm subprocess
//! - [`images`] - image reference extraction from manifest text
//! - [`scanner`] - scan pipeline and Trivy container orchestration
//! - [`cache`] - cache directory lifecycle and signal cleanup
//! - [`output`] - result aggregation and terminal messages
//! - [`error`] - error types

pub mod cache;
pub mod cli;
pub mod error;
pub mod helm;
pub mod images;
pub mod output;
pub mod scanner;

// Re-export commonly used types
pub use error::{ScanError, ScanResult};
pub use scanner::{scan_chart, ImageScanner, ScanOptions, TrivyScanner};
