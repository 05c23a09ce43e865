//! Resolved style snapshot for a single host element.
//!
//! The bag is a closed schema: every property the translator reads has a
//! named field, so the converters can match on it without guessing at
//! field presence. Values are the already-resolved computed values the
//! host reports; no cascade work happens on this side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A CSS value as reported by the host: either a raw string
/// (`"240px"`, `"auto"`) or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Number(f32),
    Text(String),
}

impl CssValue {
    /// Returns the textual form, if the host supplied one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CssValue::Text(s) => Some(s.as_str()),
            CssValue::Number(_) => None,
        }
    }

    /// True for empty strings and the `auto` keyword.
    pub fn is_auto(&self) -> bool {
        match self {
            CssValue::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == "auto"
            }
            CssValue::Number(_) => false,
        }
    }

    /// Resolve to pixels with the unit converter's rules.
    pub fn to_px(&self) -> f32 {
        match self {
            CssValue::Number(n) => *n,
            CssValue::Text(s) => crate::style::units::convert_unit(s),
        }
    }
}

impl From<&str> for CssValue {
    fn from(value: &str) -> Self {
        CssValue::Text(value.to_string())
    }
}

impl From<String> for CssValue {
    fn from(value: String) -> Self {
        CssValue::Text(value)
    }
}

impl From<f32> for CssValue {
    fn from(value: f32) -> Self {
        CssValue::Number(value)
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssValue::Number(n) => write!(f, "{}", n),
            CssValue::Text(s) => f.write_str(s),
        }
    }
}

/// Per-side box values (`margin`, `padding`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxSides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<CssValue>,
}

/// Border shorthand values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderBag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<CssValue>,
}

/// Computed style snapshot for one element.
///
/// Unknown keys in the incoming JSON are ignored and missing keys stay
/// `None`, which every converter treats as "use the documented default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleBag {
    // Layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<CssValue>,

    // Flexbox
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_wrap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<CssValue>,

    // Grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_template_columns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_template_rows: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_auto_flow: Option<String>,

    // Box model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<CssValue>,
    pub margin: BoxSides,
    pub padding: BoxSides,
    pub border: BorderBag,

    // Colors and background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_repeat: Option<String>,

    // Typography
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<String>,

    // Effects and visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<CssValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    // Overflow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_y: Option<String>,

    // Replaced content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<CssValue>,
}

impl StyleBag {
    /// `display` keyword, trimmed; empty when absent.
    pub fn display_keyword(&self) -> &str {
        self.display.as_deref().map(str::trim).unwrap_or("")
    }

    /// `position` keyword, trimmed; empty when absent.
    pub fn position_keyword(&self) -> &str {
        self.position.as_deref().map(str::trim).unwrap_or("")
    }

    /// True for `absolute` and `fixed` positioning.
    pub fn is_out_of_flow(&self) -> bool {
        matches!(self.position_keyword(), "absolute" | "fixed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_bag_deserializes_nested_sub_bags() {
        let json = r##"{
            "display": "flex",
            "width": "240px",
            "zIndex": 3,
            "padding": {"top": "4px", "left": "8px"},
            "border": {"width": "1px", "style": "solid", "color": "#333", "radius": "6px"},
            "someUnknownKey": "ignored"
        }"##;

        let bag: StyleBag = serde_json::from_str(json).unwrap();
        assert_eq!(bag.display.as_deref(), Some("flex"));
        assert_eq!(bag.width, Some(CssValue::Text("240px".into())));
        assert_eq!(bag.z_index, Some(CssValue::Number(3.0)));
        assert_eq!(bag.padding.top, Some(CssValue::Text("4px".into())));
        assert!(bag.padding.right.is_none());
        assert_eq!(bag.border.color.as_deref(), Some("#333"));
    }

    #[test]
    fn css_value_auto_detection() {
        assert!(CssValue::from("auto").is_auto());
        assert!(CssValue::from("  ").is_auto());
        assert!(!CssValue::from("0px").is_auto());
        assert!(!CssValue::Number(0.0).is_auto());
    }

    #[test]
    fn out_of_flow_positions() {
        let mut bag = StyleBag {
            position: Some("fixed".into()),
            ..StyleBag::default()
        };
        assert!(bag.is_out_of_flow());
        bag.position = Some("sticky".into());
        assert!(!bag.is_out_of_flow());
    }
}
