//! Design-tool-shaped output of the style translator.
//!
//! Field names and enum spellings are part of the output schema
//! (`SOLID`, `DROP_SHADOW`, `HORIZONTAL`, `STRETCH`, ...). Renaming any of
//! them requires bumping [`crate::output::H2F_OUTPUT_VERSION`].

use serde::{Deserialize, Serialize};

/// Normalized RGB channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
}

/// A paintable color. Absence of color is `Option::None`, never black.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorValue {
    pub rgb: Rgb,
    pub opacity: f32,
}

impl ColorValue {
    pub fn opaque(rgb: Rgb) -> Self {
        Self { rgb, opacity: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f32,
    pub color: Rgb,
    pub opacity: f32,
}

/// Fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Paint {
    Solid {
        color: Rgb,
        opacity: f32,
    },
    #[serde(rename_all = "camelCase")]
    GradientLinear {
        gradient_stops: Vec<GradientStop>,
        gradient_transform: [[f32; 3]; 2],
    },
}

impl Paint {
    pub fn solid(color: ColorValue) -> Self {
        Paint::Solid {
            color: color.rgb,
            opacity: color.opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    DropShadow,
    InnerShadow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMode {
    Normal,
}

/// A 2D offset; may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

/// Shadow effect as consumed by the design host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    pub color: ColorValue,
    pub offset: Offset,
    pub radius: f32,
    pub spread: f32,
    pub visible: bool,
    pub blend_mode: BlendMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    None,
    Horizontal,
    Vertical,
}

/// Primary-axis distribution (from `justify-content`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutAlign {
    Min,
    Center,
    Max,
    SpaceBetween,
}

/// Counter-axis alignment (from `align-items`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAxisAlign {
    Min,
    Center,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Positioning {
    Auto,
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Raw offsets of an absolutely positioned element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AbsolutePosition {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Grid metadata carried verbatim next to the inferred one-axis mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    pub template_columns: Option<String>,
    pub template_rows: Option<String>,
    pub gap: Option<String>,
    pub auto_flow: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    pub layout_mode: LayoutMode,
    pub layout_align: LayoutAlign,
    pub counter_axis_align: CounterAxisAlign,
    pub item_spacing: f32,
    pub padding: Padding,
    pub corner_radius: f32,
    pub stroke_weight: f32,
    pub opacity: f32,
    pub positioning: Positioning,
    pub z_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_properties: Option<GridProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_position: Option<AbsolutePosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineHeight {
    Auto,
    Pixels { value: f32 },
    Percent { value: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    Original,
    Upper,
    Lower,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecorationLine {
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecorationStyle {
    Solid,
    Dotted,
    Dashed,
    Wavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub font_fallbacks: Vec<String>,
    pub font_size: f32,
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub line_height: LineHeight,
    pub letter_spacing: f32,
    pub text_case: TextCase,
    pub text_decoration_line: TextDecorationLine,
    pub text_decoration_style: TextDecorationStyle,
    pub paragraph_spacing: f32,
    pub paragraph_indent: f32,
    pub color: Option<ColorValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintType {
    Min,
    Max,
    Center,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub horizontal: ConstraintType,
    pub vertical: ConstraintType,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            horizontal: ConstraintType::Min,
            vertical: ConstraintType::Min,
        }
    }
}

/// Everything the design host needs to paint one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub effects: Vec<Effect>,
    pub layout: Layout,
    pub typography: Typography,
    pub constraints: Constraints,
}
