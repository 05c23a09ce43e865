use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::style::FontName;
use crate::types::PageData;

/// Schema version for output payloads and extracted page metadata.
pub const H2F_OUTPUT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum H2fOutput {
    Extract(Box<ExtractOutput>),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Snapshot,
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOutput {
    pub version: String,
    pub source: SourceDescriptor,
    pub stats: ExtractStats,
    /// Design-host fonts the text nodes need, first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fonts_to_load: Vec<FontName>,
    pub data: PageData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractStats {
    pub node_count: usize,
    pub image_count: usize,
    pub svg_count: usize,
    pub size_bytes: usize,
    pub max_bytes: usize,
    /// Set when the data exceeded `max_bytes` and was emitted anyway.
    pub oversize: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

impl H2fOutput {
    pub fn error(payload: ErrorPayload) -> Self {
        H2fOutput::Error(ErrorOutput {
            version: H2F_OUTPUT_VERSION.to_string(),
            message: None,
            error: payload,
        })
    }
}
