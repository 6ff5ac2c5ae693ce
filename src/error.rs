//! Error types for helmscan.
//!
//! Uses `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Main error type for chart scanning operations.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("could not render chart '{chart}': {stderr}")]
    HelmTemplate { chart: String, stderr: String },

    #[error("could not run '{command}': {source}")]
    CommandFailed {
        command: String,
        source: std::io::Error,
    },

    #[error("no container images found in chart '{0}' (did you run 'helm dependency update'?)")]
    NoImages(String),

    #[error("docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("could not create cache directory: {0}")]
    CacheDir(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
