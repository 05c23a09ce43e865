use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{ParseError, Url};

#[derive(Debug, Error)]
pub enum H2fError {
    #[error("Root element not found: {selector}")]
    RootNotFound { selector: String },

    #[error("Extracted data too large: {} (max: {})", format_mib(*size_bytes), format_mib(*max_bytes))]
    OversizeResult { size_bytes: usize, max_bytes: usize },

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid extraction data: {}", .0.join(", "))]
    InvalidData(Vec<String>),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),
}

fn format_mib(bytes: usize) -> String {
    format!("{:.2}MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Stable, machine-readable failure codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoContent,
    MemoryError,
    InvalidSelector,
    ExtractionFailed,
    ParseError,
    Timeout,
    PermissionDenied,
    NetworkError,
    ConfigError,
}

impl H2fError {
    pub fn root_not_found(selector: impl Into<String>) -> Self {
        H2fError::RootNotFound {
            selector: selector.into(),
        }
    }

    pub fn capture(message: impl Into<String>) -> Self {
        H2fError::Capture(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            H2fError::RootNotFound { .. } => ErrorCode::NoContent,
            H2fError::OversizeResult { .. } => ErrorCode::MemoryError,
            H2fError::InvalidSelector(_) => ErrorCode::InvalidSelector,
            H2fError::InvalidData(_) => ErrorCode::ExtractionFailed,
            H2fError::Capture(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("timeout") || lower.contains("timed out") {
                    ErrorCode::Timeout
                } else if lower.contains("net::") || lower.contains("network") {
                    ErrorCode::NetworkError
                } else {
                    ErrorCode::ExtractionFailed
                }
            }
            H2fError::Config(_) => ErrorCode::ConfigError,
            H2fError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                ErrorCode::PermissionDenied
            }
            H2fError::Io(_) => ErrorCode::ConfigError,
            H2fError::Serialization(_) => ErrorCode::ParseError,
            H2fError::InvalidUrl(_) => ErrorCode::ConfigError,
        }
    }

    /// Oversize results still carry a complete tree; the caller may keep it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, H2fError::OversizeResult { .. })
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let code = self.code();
        match self {
            H2fError::RootNotFound { selector } => ErrorPayload::new(
                code,
                self.to_string(),
                "Check --selector against the page; the default is `body`.",
            )
            .with_details(serde_json::json!({ "selector": selector })),
            H2fError::OversizeResult {
                size_bytes,
                max_bytes,
            } => ErrorPayload::new(
                code,
                self.to_string(),
                "Narrow --selector, lower --max-depth, raise --max-bytes, or pass --allow-oversize.",
            )
            .with_details(serde_json::json!({
                "sizeInBytes": size_bytes,
                "maxSize": max_bytes,
            })),
            H2fError::InvalidSelector(selector) => ErrorPayload::new(
                code,
                self.to_string(),
                "Use a simple selector: tag, #id, .class, compounds, and descendant combinators.",
            )
            .with_details(serde_json::json!({ "selector": selector })),
            H2fError::InvalidData(errors) => ErrorPayload::new(
                code,
                self.to_string(),
                "Inspect the input snapshot; run with --verbose for details.",
            )
            .with_details(serde_json::json!({ "errors": errors })),
            H2fError::Capture(msg) => {
                let remediation = match code {
                    ErrorCode::Timeout => {
                        "Try increasing capture timeouts in the config or ensure the page loads without blocking."
                    }
                    ErrorCode::NetworkError => "Check connectivity/proxy/VPN and retry.",
                    _ => "Re-run with --verbose; verify the page renders in a regular browser.",
                };
                ErrorPayload::new(code, msg.to_string(), remediation)
            }
            H2fError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                let remediation = if lower.contains("playwright npm package is missing") {
                    "Install Playwright (e.g., `npm install playwright` and `npx playwright install chromium`)."
                } else if lower.contains("chromium executable") {
                    "Run `npx playwright install chromium` (or `playwright install chromium`) to download the browser."
                } else if lower.contains("spawn playwright helper")
                    || lower.contains("node command")
                    || lower.contains("not found on path")
                {
                    "Install Node.js and ensure the node binary is on PATH; rerun after installing Playwright if needed."
                } else if lower.contains("config file") {
                    "Fix the TOML file passed via --config (or ~/.config/h2f/config.toml)."
                } else if lower.contains("file not found") {
                    "Verify the file exists; use an absolute path or run from the working directory."
                } else {
                    "Check flags/paths (e.g., --max-depth, --selector) and the config file."
                };
                ErrorPayload::new(code, msg.to_string(), remediation)
            }
            H2fError::Io(e) => {
                ErrorPayload::new(code, e.to_string(), "Check file paths/permissions.")
            }
            H2fError::Serialization(e) => ErrorPayload::new(
                code,
                e.to_string(),
                "Check the JSON input matches the host snapshot format; run with --verbose for details.",
            ),
            H2fError::InvalidUrl(e) => ErrorPayload::new(
                code,
                e.to_string(),
                "Verify URL/format (e.g., https://example.com).",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, H2fError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorPayload {
    pub fn new(code: ErrorCode, message: String, remediation: impl Into<String>) -> Self {
        Self {
            code,
            message,
            remediation: Some(remediation.into()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

const SENSITIVE_PARAMS: &[&str] = &["token", "key", "secret", "password", "auth"];

/// Strip credential-like query parameters before a URL reaches a log line.
pub fn sanitize_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return "[invalid URL]".to_string();
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !SENSITIVE_PARAMS.contains(&name.as_ref()))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.to_string()
}
