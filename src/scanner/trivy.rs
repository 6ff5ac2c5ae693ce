//! Trivy container orchestration.
//!
//! Each image is scanned by a throwaway container running the pinned
//! scanner image, with the host cache directory bind-mounted so the
//! vulnerability database is downloaded at most once per run. The
//! container lifecycle (create, start, wait, logs, remove) goes through
//! the Docker API client; the daemon connection is configured from the
//! environment (`DOCKER_HOST`, TLS settings).

use crate::error::ScanResult;
use crate::scanner::{ImageScanner, ScanOptions};
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, LogsOptions, RemoveContainerOptions, StartContainerOptions,
    WaitContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::image::CreateImageOptions;
use bollard::models::HostConfig;
use bollard::Docker;
use futures::StreamExt;
use std::path::Path;
use tracing::{debug, info};

/// Cache path Trivy expects inside the container.
const CONTAINER_CACHE_PATH: &str = "/.cache";

/// Unprivileged uid the scanner runs as, matching the image's default.
const SCANNER_USER: &str = "1000";

/// Runs vulnerability scans in Trivy containers via the Docker API.
pub struct TrivyScanner {
    docker: Docker,
}

impl TrivyScanner {
    /// Connect to the Docker daemon using environment configuration.
    pub fn from_env() -> ScanResult<Self> {
        let docker = Docker::connect_with_defaults()?;
        Ok(Self { docker })
    }

    /// Pull the scanner image, draining the progress stream.
    pub async fn pull_image(&self, image: &str) -> ScanResult<()> {
        info!("pulling scanner image {image}");
        let mut pull = self.docker.create_image(
            Some(CreateImageOptions {
                from_image: image,
                ..Default::default()
            }),
            None,
            None,
        );
        while let Some(progress) = pull.next().await {
            let progress = progress?;
            if let Some(status) = progress.status {
                debug!("pull: {status}");
            }
        }
        info!("pulled scanner image {image}");
        Ok(())
    }
}

#[async_trait]
impl ImageScanner for TrivyScanner {
    /// Run one scanner container against `image` and return its stdout.
    ///
    /// Blocks until the container leaves the running state. A non-zero
    /// container exit is not fatal (Trivy's `--exit-code` pass-through
    /// relies on it); any Docker API failure is.
    async fn scan_image(
        &self,
        image: &str,
        opts: &ScanOptions,
        cache_dir: &Path,
    ) -> ScanResult<String> {
        let cmd = trivy_command(opts, image);
        let config = Config {
            image: Some(opts.trivy_image.clone()),
            cmd: Some(cmd.clone()),
            tty: Some(true),
            user: Some(SCANNER_USER.to_string()),
            host_config: Some(HostConfig {
                binds: Some(vec![format!(
                    "{}:{}",
                    cache_dir.display(),
                    CONTAINER_CACHE_PATH
                )]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let created = self
            .docker
            .create_container(None::<CreateContainerOptions<String>>, config)
            .await?;
        debug!("starting container {} with command: {cmd:?}", created.id);
        self.docker
            .start_container(&created.id, None::<StartContainerOptions<String>>)
            .await?;

        let mut wait = self.docker.wait_container(
            &created.id,
            Some(WaitContainerOptions {
                condition: "not-running",
            }),
        );
        while let Some(status) = wait.next().await {
            match status {
                Ok(exit) => debug!("scanner exited with status {}", exit.status_code),
                // The wait endpoint reports non-zero container exits as
                // errors; those belong to the scanner, not to us.
                Err(DockerError::DockerContainerWaitError { code, .. }) => {
                    debug!("scanner exited with status {code}")
                }
                Err(err) => return Err(err.into()),
            }
        }

        let mut logs = self.docker.logs(
            &created.id,
            Some(LogsOptions::<String> {
                stdout: true,
                stderr: false,
                ..Default::default()
            }),
        );
        let mut report = String::new();
        while let Some(chunk) = logs.next().await {
            report.push_str(&String::from_utf8_lossy(&chunk?.into_bytes()));
        }

        // The report is already in memory; removal failure only leaks
        // an exited container.
        if let Err(err) = self
            .docker
            .remove_container(&created.id, None::<RemoveContainerOptions>)
            .await
        {
            debug!("could not remove container {}: {err}", created.id);
        }

        Ok(report)
    }
}

/// Compose the Trivy command line for one image.
///
/// Fixed cache flags first, then format and verbosity, then any
/// pass-through arguments, with the image name last.
pub(crate) fn trivy_command(opts: &ScanOptions, image: &str) -> Vec<String> {
    let mut cmd = vec!["--cache-dir".to_string(), CONTAINER_CACHE_PATH.to_string()];
    if opts.json {
        cmd.push("-f".to_string());
        cmd.push("json".to_string());
    }
    if opts.debug {
        cmd.push("-d".to_string());
    } else {
        cmd.push("-q".to_string());
    }
    cmd.extend(opts.trivy_args.iter().cloned());
    cmd.push(image.to_string());
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(json: bool, debug: bool, extra: &[&str]) -> ScanOptions {
        ScanOptions {
            json,
            debug,
            trivy_image: "aquasec/trivy:latest".to_string(),
            helm_bin: "helm".to_string(),
            trivy_args: extra.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn quiet_plain_command() {
        assert_eq!(
            trivy_command(&opts(false, false, &[]), "nginx:1.25"),
            vec!["--cache-dir", "/.cache", "-q", "nginx:1.25"]
        );
    }

    #[test]
    fn json_adds_format_flag_before_verbosity() {
        assert_eq!(
            trivy_command(&opts(true, false, &[]), "nginx:1.25"),
            vec!["--cache-dir", "/.cache", "-f", "json", "-q", "nginx:1.25"]
        );
    }

    #[test]
    fn debug_replaces_quiet() {
        assert_eq!(
            trivy_command(&opts(false, true, &[]), "nginx:1.25"),
            vec!["--cache-dir", "/.cache", "-d", "nginx:1.25"]
        );
    }

    #[test]
    fn passthrough_args_come_before_the_image() {
        assert_eq!(
            trivy_command(&opts(true, false, &["--severity", "CRITICAL"]), "redis:7"),
            vec![
                "--cache-dir",
                "/.cache",
                "-f",
                "json",
                "-q",
                "--severity",
                "CRITICAL",
                "redis:7"
            ]
        );
    }
}
