//! Live page capture through a Node + Playwright helper process.

use std::process::Stdio;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use url::Url;

use crate::config::CaptureConfig;
use crate::error::sanitize_url;
use crate::types::{HostDocument, Viewport};
use crate::{H2fError, Result};

use super::playwright::{
    ensure_node_available, ensure_playwright_available, map_playwright_error,
    map_playwright_status_error, map_spawn_error, ScriptError, CAPTURE_SCRIPT, MOCK_CAPTURE_ENV,
};

/// Settings for one capture run.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    pub node_command: String,
    pub viewport: Viewport,
    pub navigation_timeout: Duration,
    pub network_idle_timeout: Duration,
    /// Upper bound for the whole helper process.
    pub process_timeout: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        CaptureConfig::default().into()
    }
}

impl From<CaptureConfig> for CaptureOptions {
    fn from(cfg: CaptureConfig) -> Self {
        Self {
            node_command: cfg.node_command,
            viewport: cfg.viewport,
            navigation_timeout: cfg.navigation_timeout,
            network_idle_timeout: cfg.network_idle_timeout,
            process_timeout: cfg.process_timeout,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct CaptureResult {
    status: String,
    #[serde(default)]
    document: Option<HostDocument>,
}

/// Capture `url` into a host snapshot.
///
/// When `H2F_MOCK_CAPTURE` names a snapshot file, that file is returned
/// instead and no browser is started.
pub async fn capture_page(url: &str, options: &CaptureOptions) -> Result<HostDocument> {
    let parsed = Url::parse(url)?;
    if !matches!(parsed.scheme(), "http" | "https" | "file") {
        return Err(H2fError::Config(format!(
            "Unsupported URL scheme '{}'; expected http, https or file",
            parsed.scheme()
        )));
    }

    if let Some(path) = std::env::var_os(MOCK_CAPTURE_ENV) {
        debug!("capture: using mock snapshot {}", path.to_string_lossy());
        let raw = tokio::fs::read_to_string(&path).await?;
        let mut document: HostDocument = serde_json::from_str(&raw)?;
        document.url.get_or_insert_with(|| parsed.to_string());
        return Ok(document);
    }

    info!(
        "capture: launching headless browser for {} ({}, nav {}s, idle {}s)",
        sanitize_url(url),
        options.viewport,
        options.navigation_timeout.as_secs(),
        options.network_idle_timeout.as_secs()
    );
    ensure_node_available(&options.node_command).await?;
    ensure_playwright_available(&options.node_command).await?;

    let mut cmd = Command::new(&options.node_command);
    cmd.arg("-e")
        .arg(CAPTURE_SCRIPT)
        .arg(parsed.as_str())
        .arg(options.viewport.width.to_string())
        .arg(options.viewport.height.to_string())
        .arg(options.navigation_timeout.as_millis().to_string())
        .arg(options.network_idle_timeout.as_millis().to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = cmd
        .spawn()
        .map_err(|err| map_spawn_error(err, &options.node_command))?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_pipe {
            let _ = out.read_to_end(&mut buf).await;
        }
        buf
    });

    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_pipe {
            let _ = err.read_to_end(&mut buf).await;
        }
        buf
    });

    let status = match timeout(options.process_timeout, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(err)) => return Err(H2fError::Io(err)),
        Err(_) => {
            let _ = child.kill().await;
            let _ = child.wait().await;
            warn!(
                "capture: helper killed after {:?} on {}",
                options.process_timeout,
                sanitize_url(url)
            );
            return Err(H2fError::capture(format!(
                "Playwright timed out after {:?}",
                options.process_timeout
            )));
        }
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr);
        return Err(map_playwright_error(status.to_string(), &stderr));
    }

    let stdout = String::from_utf8_lossy(&stdout);
    let document = parse_capture_output(&stdout)?;
    debug!(
        "capture: snapshot of {} received in {:.1}s",
        sanitize_url(url),
        start.elapsed().as_secs_f32()
    );
    Ok(document)
}

fn parse_capture_output(stdout: &str) -> Result<HostDocument> {
    let result: CaptureResult = serde_json::from_str(stdout.trim()).map_err(|e| {
        H2fError::capture(format!("Failed to parse Playwright output: {}", e))
    })?;

    if result.status != "ok" {
        if let Ok(err) = serde_json::from_str::<ScriptError>(stdout.trim()) {
            return Err(map_playwright_status_error(&err.status, err.message));
        }
        return Err(H2fError::capture(format!(
            "Playwright returned non-ok status: {}",
            result.status
        )));
    }

    result.document.ok_or_else(|| {
        H2fError::capture("Playwright returned ok status but no document snapshot")
    })
}
