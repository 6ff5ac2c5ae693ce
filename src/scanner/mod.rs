//! Scan pipeline - renders a chart and scans every image it references.
//!
//! Images are scanned strictly sequentially; the only concurrency in
//! the whole program is the signal-cleanup task. A failure at any step
//! aborts the run.

pub mod trivy;

use crate::cli::Args;
use crate::error::{ScanError, ScanResult};
use crate::{helm, images, output};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub use trivy::TrivyScanner;

/// Configuration for one scan run.
///
/// Carries what the scanner containers need to know; the cache
/// directory travels separately since its lifetime is managed by the
/// caller.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Ask the scanner for JSON reports and merge them into one array.
    pub json: bool,
    /// Debug logging, forwarded to the scanner (`-d` instead of `-q`).
    pub debug: bool,
    /// Scanner image to run.
    pub trivy_image: String,
    /// Helm executable used to render the chart.
    pub helm_bin: String,
    /// Pass-through scanner arguments, inserted before the image name.
    pub trivy_args: Vec<String>,
}

impl From<&Args> for ScanOptions {
    fn from(args: &Args) -> Self {
        Self {
            json: args.output.is_json(),
            debug: args.debug,
            trivy_image: args.trivy_image.clone(),
            helm_bin: args.helm_bin.clone(),
            trivy_args: args.trivy_args.clone(),
        }
    }
}

/// Interface to whatever runs a vulnerability scan for one image.
///
/// Abstracting the scanner keeps the pipeline testable without a
/// Docker daemon.
#[async_trait]
pub trait ImageScanner {
    /// Scan one image and return the scanner's stdout as text.
    async fn scan_image(
        &self,
        image: &str,
        opts: &ScanOptions,
        cache_dir: &Path,
    ) -> ScanResult<String>;
}

/// Scan every image referenced by a chart.
///
/// Renders the chart, extracts its unique images, and scans them in
/// extraction order. Zero extracted images is a configuration error
/// for the chart and fatal.
pub async fn scan_chart<S>(
    scanner: &S,
    chart: &str,
    opts: &ScanOptions,
    cache_dir: &Path,
) -> ScanResult<()>
where
    S: ImageScanner + Sync,
{
    info!("scanning chart {chart}");
    let manifest = helm::render_chart(&opts.helm_bin, chart).await?;
    let images = images::extract_images(&manifest);
    if images.is_empty() {
        return Err(ScanError::NoImages(chart.to_string()));
    }
    debug!("found images for chart {chart}: {images:?}");
    scan_images(scanner, &images, opts, cache_dir).await
}

/// Scan a list of images sequentially and print the results.
///
/// Plain mode prints each report as its scan completes; JSON mode
/// collects the per-image fragments and prints one merged array at the
/// end.
pub async fn scan_images<S>(
    scanner: &S,
    images: &[String],
    opts: &ScanOptions,
    cache_dir: &Path,
) -> ScanResult<()>
where
    S: ImageScanner + Sync,
{
    let mut fragments = Vec::new();

    for image in images {
        debug!("scanning image {image}");
        let spinner = scan_spinner(opts, image);
        let report = scanner.scan_image(image, opts, cache_dir).await?;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        if opts.json {
            fragments.push(report);
        } else {
            println!("{report}");
        }
    }

    if opts.json {
        let merged = output::merge_json_outputs(&fragments);
        output::warn_if_invalid_json(&merged);
        println!("{merged}");
    }
    Ok(())
}

/// Spinner shown while a scanner container runs.
///
/// Suppressed in JSON mode (stdout is machine-read) and in debug mode
/// (it would interleave with log lines).
fn scan_spinner(opts: &ScanOptions, image: &str) -> Option<ProgressBar> {
    if opts.json || opts.debug {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Scanning {image}"));
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}
