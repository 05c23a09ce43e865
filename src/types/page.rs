//! Page-level output: metadata, the visual tree and asset inventories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::node::VisualNode;
use super::style::CssValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportParseError {
    #[error("Invalid viewport '{0}': expected WIDTHxHEIGHT (e.g., 1440x900)")]
    InvalidFormat(String),
    #[error("Invalid viewport dimension: {0}")]
    InvalidDimension(String),
    #[error("Viewport dimensions must be positive")]
    Zero,
}

impl FromStr for Viewport {
    type Err = ViewportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| ViewportParseError::InvalidFormat(s.to_string()))?;

        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| ViewportParseError::InvalidDimension(part.trim().to_string()))
        };
        let (width, height) = (parse(w)?, parse(h)?);
        if width == 0 || height == 0 {
            return Err(ViewportParseError::Zero);
        }
        Ok(Viewport { width, height })
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub url: Option<String>,
    pub title: Option<String>,
    /// Milliseconds since the Unix epoch at assembly time.
    pub timestamp: u64,
    pub viewport: Viewport,
    /// Schema version of the extracted data.
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub src: String,
    pub alt: String,
    pub width: f32,
    pub height: f32,
    pub display_width: f32,
    pub display_height: f32,
    pub position: Position,
    pub object_fit: Option<String>,
    pub object_position: Option<String>,
    pub is_data_url: bool,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgAsset {
    pub markup: String,
    pub view_box: Option<String>,
    pub width: CssValue,
    pub height: CssValue,
    pub display_width: f32,
    pub display_height: f32,
    pub position: Position,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<CssValue>,
}

/// Complete extraction result handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub metadata: PageMetadata,
    pub tree: VisualNode,
    pub images: Vec<ImageAsset>,
    pub svgs: Vec<SvgAsset>,
    pub fonts: Vec<String>,
}
