//! Helm subprocess invocation.
//!
//! Renders a chart's templates into concrete manifests by shelling out
//! to `helm template`. Helm itself is treated as a black box; only its
//! stdout text is consumed downstream.

use crate::error::{ScanError, ScanResult};
use tokio::process::Command;
use tracing::debug;

/// Render a chart with `<helm_bin> template <chart>` and return the
/// combined manifest text.
///
/// A non-zero helm exit status is fatal for the chart; the captured
/// stderr is carried in the error so the user sees helm's own message.
pub async fn render_chart(helm_bin: &str, chart: &str) -> ScanResult<String> {
    debug!("rendering chart {chart} with {helm_bin}");
    let output = Command::new(helm_bin)
        .arg("template")
        .arg(chart)
        .output()
        .await
        .map_err(|source| ScanError::CommandFailed {
            command: format!("{helm_bin} template {chart}"),
            source,
        })?;

    if !output.status.success() {
        return Err(ScanError::HelmTemplate {
            chart: chart.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_reports_the_command() {
        let err = render_chart("helm-binary-that-does-not-exist", "mychart")
            .await
            .unwrap_err();
        match err {
            ScanError::CommandFailed { command, .. } => {
                assert!(command.contains("helm-binary-that-does-not-exist"));
                assert!(command.contains("mychart"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn failing_command_surfaces_stderr() {
        // `false` exits non-zero with empty output, standing in for a
        // helm invocation against a broken chart.
        let err = render_chart("false", "mychart").await.unwrap_err();
        match err {
            ScanError::HelmTemplate { chart, .. } => assert_eq!(chart, "mychart"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
