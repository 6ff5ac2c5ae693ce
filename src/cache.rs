//! Cache directory lifecycle.
//!
//! Scanner containers share one host directory for the vulnerability
//! database so it is downloaded at most once per run. The default is a
//! temporary directory removed on every exit path, including signals;
//! `--cache-dir` switches to a persistent directory that is never
//! removed by helmscan.

use crate::error::{ScanError, ScanResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Host-side cache directory shared by all scanner containers in a run.
#[derive(Debug)]
pub enum CacheDir {
    /// Scratch directory, removed when the value is dropped.
    Temp(tempfile::TempDir),
    /// User-supplied directory, left in place between runs.
    Persistent(PathBuf),
}

impl CacheDir {
    /// Create the cache directory for this run.
    ///
    /// With `Some(dir)` the directory is created if missing and kept.
    /// With `None` a `helmscan-` temp directory is created; its `Drop`
    /// removes it on normal exit.
    pub fn new(persistent: Option<PathBuf>) -> ScanResult<Self> {
        match persistent {
            Some(dir) => {
                fs::create_dir_all(&dir).map_err(ScanError::CacheDir)?;
                debug!("using persistent cache directory {}", dir.display());
                Ok(CacheDir::Persistent(dir))
            }
            None => {
                let tmp = tempfile::Builder::new()
                    .prefix("helmscan-")
                    .tempdir()
                    .map_err(ScanError::CacheDir)?;
                debug!(
                    "using {} as cache directory for the vuln db",
                    tmp.path().display()
                );
                Ok(CacheDir::Temp(tmp))
            }
        }
    }

    /// Path to bind-mount into scanner containers.
    pub fn path(&self) -> &Path {
        match self {
            CacheDir::Temp(tmp) => tmp.path(),
            CacheDir::Persistent(dir) => dir,
        }
    }

    /// Whether the directory is removed when the run ends.
    pub fn is_temporary(&self) -> bool {
        matches!(self, CacheDir::Temp(_))
    }
}

/// Spawn the background task that handles SIGINT/SIGTERM.
///
/// `TempDir`'s `Drop` never runs when the process is killed by a
/// signal, so the task removes the scratch directory itself before
/// forcing the exit. `cleanup` is `None` for persistent cache dirs.
pub fn spawn_signal_cleanup(cleanup: Option<PathBuf>) {
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        if let Some(dir) = cleanup {
            debug!("removing cache directory {}", dir.display());
            let _ = fs::remove_dir_all(&dir);
        }
        // Conventional exit status for SIGINT.
        std::process::exit(130);
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_cache_dir_exists_while_held() {
        let cache = CacheDir::new(None).unwrap();
        assert!(cache.is_temporary());
        assert!(cache.path().is_dir());

        let path = cache.path().to_path_buf();
        drop(cache);
        assert!(!path.exists());
    }

    #[test]
    fn persistent_cache_dir_is_created_and_kept() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("trivy-cache");

        let cache = CacheDir::new(Some(dir.clone())).unwrap();
        assert!(!cache.is_temporary());
        assert!(dir.is_dir());

        drop(cache);
        assert!(dir.is_dir());
    }
}
