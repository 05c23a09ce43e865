//! Playwright integration: the inline capture script, error mapping, and
//! availability checks for Node.js and Playwright.

use crate::{H2fError, Result};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Capture script. Navigates, waits for network idle, then serializes the
/// document into the host snapshot shape (`HostDocument`) on stdout.
pub(crate) const CAPTURE_SCRIPT: &str = r#"
const [, url, width, height, navTimeout, idleTimeout] = process.argv;

async function run() {
  let browser;
  try {
    const { chromium } = require('playwright');
    browser = await chromium.launch({ headless: true });
    const context = await browser.newContext({
      viewport: {
        width: parseInt(width, 10),
        height: parseInt(height, 10)
      }
    });
    const page = await context.newPage();
    const navMs = parseInt(navTimeout, 10);
    const idleMs = parseInt(idleTimeout, 10);

    await page.goto(url, { waitUntil: 'networkidle', timeout: navMs });
    await page.waitForLoadState('networkidle', { timeout: idleMs });

    const snapshot = await page.evaluate(() => {
      const side = (s, prop) => ({
        top: s.getPropertyValue(`${prop}-top`),
        right: s.getPropertyValue(`${prop}-right`),
        bottom: s.getPropertyValue(`${prop}-bottom`),
        left: s.getPropertyValue(`${prop}-left`)
      });

      function styles(el) {
        const s = window.getComputedStyle(el);
        return {
          display: s.display,
          position: s.position,
          top: s.top,
          left: s.left,
          right: s.right,
          bottom: s.bottom,
          zIndex: s.zIndex,
          flexDirection: s.flexDirection,
          flexWrap: s.flexWrap,
          justifyContent: s.justifyContent,
          alignItems: s.alignItems,
          gap: s.gap,
          gridTemplateColumns: s.gridTemplateColumns,
          gridTemplateRows: s.gridTemplateRows,
          gridGap: s.gap,
          gridAutoFlow: s.gridAutoFlow,
          width: s.width,
          height: s.height,
          margin: side(s, 'margin'),
          padding: side(s, 'padding'),
          border: {
            width: s.borderWidth,
            style: s.borderStyle,
            color: s.borderColor,
            radius: s.borderRadius
          },
          color: s.color,
          backgroundColor: s.backgroundColor,
          backgroundImage: s.backgroundImage,
          backgroundSize: s.backgroundSize,
          backgroundPosition: s.backgroundPosition,
          backgroundRepeat: s.backgroundRepeat,
          fontFamily: s.fontFamily,
          fontSize: s.fontSize,
          fontWeight: s.fontWeight,
          fontStyle: s.fontStyle,
          lineHeight: s.lineHeight,
          letterSpacing: s.letterSpacing,
          textAlign: s.textAlign,
          textDecoration: s.textDecoration,
          textTransform: s.textTransform,
          opacity: s.opacity,
          visibility: s.visibility,
          boxShadow: s.boxShadow,
          textShadow: s.textShadow,
          transform: s.transform,
          filter: s.filter,
          overflow: s.overflow,
          overflowX: s.overflowX,
          overflowY: s.overflowY,
          objectFit: s.objectFit,
          objectPosition: s.objectPosition,
          fill: s.fill,
          stroke: s.stroke,
          strokeWidth: s.strokeWidth
        };
      }

      function element(el) {
        const rect = el.getBoundingClientRect();
        const attributes = {};
        for (const attr of el.attributes) {
          attributes[attr.name] = attr.value;
        }
        const children = [];
        for (const child of el.childNodes) {
          if (child.nodeType === Node.ELEMENT_NODE) {
            children.push({ nodeType: 'element', ...element(child) });
          } else if (child.nodeType === Node.TEXT_NODE && child.textContent) {
            children.push({ nodeType: 'text', text: child.textContent });
          }
        }
        const node = {
          tagName: el.tagName,
          attributes,
          styles: styles(el),
          bounds: { x: rect.x, y: rect.y, width: rect.width, height: rect.height },
          hasLayoutBox: el.getClientRects().length > 0,
          children
        };
        if (el instanceof HTMLImageElement) {
          node.intrinsicSize = { width: el.naturalWidth, height: el.naturalHeight };
        }
        return node;
      }

      return {
        url: window.location.href,
        title: document.title,
        viewport: { width: window.innerWidth, height: window.innerHeight },
        root: element(document.documentElement)
      };
    });

    console.log(JSON.stringify({ status: 'ok', document: snapshot }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close();
    }
  }
}

run();
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable naming a snapshot file that replaces live capture.
pub const MOCK_CAPTURE_ENV: &str = "H2F_MOCK_CAPTURE";

const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

/// Error result from the capture script.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

/// Maps a spawn error to an appropriate H2fError.
pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> H2fError {
    if err.kind() == io::ErrorKind::NotFound {
        H2fError::Config(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        H2fError::Io(err)
    }
}

fn is_missing_module(message: &str) -> bool {
    message
        .to_ascii_lowercase()
        .contains("cannot find module 'playwright'")
}

fn missing_playwright() -> H2fError {
    H2fError::Config(
        "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
    )
}

/// Maps capture script stderr to an appropriate H2fError.
///
/// Setup problems (missing module, missing browser) are configuration
/// errors; everything that happens while loading the page is a capture
/// error so timeouts and network failures keep their own codes.
pub(crate) fn map_playwright_error(status_text: impl Into<String>, stderr: &str) -> H2fError {
    if let Ok(error) = serde_json::from_str::<ScriptError>(stderr.trim()) {
        return map_playwright_status_error(&error.status, error.message);
    }

    if is_missing_module(stderr) {
        return missing_playwright();
    }

    if stderr.to_ascii_lowercase().contains("timeout") {
        return H2fError::Capture(format!(
            "Playwright timeout: {}. Hint: raise capture.navigation_timeout / capture.network_idle_timeout in the config.",
            stderr.trim()
        ));
    }

    H2fError::Capture(format!(
        "Playwright exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

/// Maps a capture script status error to an appropriate H2fError.
pub(crate) fn map_playwright_status_error(status: &str, message: String) -> H2fError {
    let lower = message.to_ascii_lowercase();
    if is_missing_module(&message) {
        missing_playwright()
    } else if lower.contains("executable doesn't exist") {
        H2fError::Config(format!(
            "Playwright chromium executable is missing: {}",
            message
        ))
    } else {
        H2fError::Capture(format!("Playwright error (status {}): {}", status, message))
    }
}

/// Ensures Node.js is available on the system.
pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            H2fError::Config(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(H2fError::Config(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

/// Ensures the Playwright npm package is installed.
pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            H2fError::Config(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_playwright_error(
            format!("{:?}", output.status),
            &stderr,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn script_sends_full_text_decoration_shorthand() {
        assert!(CAPTURE_SCRIPT.contains("textDecoration: s.textDecoration,"));
        assert!(!CAPTURE_SCRIPT.contains("textDecorationLine"));
    }

    #[test]
    fn map_playwright_error_detects_missing_module() {
        let err = map_playwright_error(
            "1",
            r#"{"status":"error","message":"Cannot find module 'playwright'"}"#,
        );
        match err {
            H2fError::Config(msg) => {
                assert!(
                    msg.contains("Playwright npm package is missing"),
                    "expected missing playwright hint, got: {msg}"
                );
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn map_playwright_error_handles_plain_stderr_missing_module() {
        let err = map_playwright_error(
            "exit status: 1",
            "Error: Cannot find module 'playwright'\n    at Module._resolveFilename",
        );
        assert_eq!(err.code(), ErrorCode::ConfigError);
        assert!(err.to_string().contains("npm install playwright"));
    }

    #[test]
    fn navigation_timeout_maps_to_timeout_code() {
        let err = map_playwright_error(
            "exit status: 1",
            r#"{"status":"error","message":"Navigation timeout of 30000ms exceeded"}"#,
        );
        assert_eq!(err.code(), ErrorCode::Timeout);
        assert!(err.to_string().contains("Navigation timeout"));
    }

    #[test]
    fn plain_timeout_stderr_mentions_config_keys() {
        let err = map_playwright_error("exit status: 1", "TimeoutError: waiting for networkidle");
        assert_eq!(err.code(), ErrorCode::Timeout);
        assert!(err.to_string().contains("capture.navigation_timeout"));
    }

    #[test]
    fn dns_failures_map_to_network_error() {
        let err = map_playwright_status_error(
            "error",
            "page.goto: net::ERR_NAME_NOT_RESOLVED at https://nope.invalid/".to_string(),
        );
        assert_eq!(err.code(), ErrorCode::NetworkError);
    }

    #[test]
    fn missing_browser_binary_is_config_error() {
        let err = map_playwright_status_error(
            "error",
            "browserType.launch: Executable doesn't exist at /root/.cache/ms-playwright".to_string(),
        );
        assert_eq!(err.code(), ErrorCode::ConfigError);
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("playwright install chromium"));
    }

    #[tokio::test]
    async fn ensure_node_available_fails_for_missing_binary() {
        let err = ensure_node_available("definitely-not-a-binary")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found on PATH"));
    }

    #[tokio::test]
    async fn ensure_playwright_available_fails_for_missing_binary() {
        let result = ensure_playwright_available("definitely-not-a-binary").await;
        assert!(result.is_err());
    }
}
