//! helmscan binary entry point.

use anyhow::Context;
use clap::Parser;
use helmscan::cache::{self, CacheDir};
use helmscan::cli::Args;
use helmscan::output;
use helmscan::scanner::{scan_chart, ScanOptions, TrivyScanner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(err) = run(args).await {
        output::print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let opts = ScanOptions::from(&args);

    let cache = CacheDir::new(args.cache_dir.clone()).context("could not set up cache")?;
    // Drop never runs on a signal; the cleanup task covers that path.
    cache::spawn_signal_cleanup(
        cache
            .is_temporary()
            .then(|| cache.path().to_path_buf()),
    );

    let scanner = TrivyScanner::from_env().context("could not connect to the docker daemon")?;
    if !args.no_pull {
        scanner
            .pull_image(&args.trivy_image)
            .await
            .with_context(|| format!("could not pull scanner image {}", args.trivy_image))?;
    }

    scan_chart(&scanner, &args.chart, &opts, cache.path()).await?;
    Ok(())
}

/// Route logs to stderr so stdout carries only scan output.
fn init_logging(debug: bool) {
    let default = if debug { "helmscan=debug" } else { "helmscan=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
