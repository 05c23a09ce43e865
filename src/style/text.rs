//! Typography mapping.

use crate::types::{
    CssValue, FontStyle, LineHeight, StyleBag, TextAlign, TextCase, TextDecorationLine,
    TextDecorationStyle, Typography,
};

use super::color::parse_optional_color;
use super::font::{parse_font_family, parse_font_weight};
use super::units::{convert_unit, convert_value, leading_number, or_default, BASE_FONT_SIZE_PX};

pub fn map_typography(styles: &StyleBag) -> Typography {
    let family = parse_font_family(styles.font_family.as_deref());
    let font_size = or_default(convert_value(styles.font_size.as_ref()), BASE_FONT_SIZE_PX);
    let font_size = if font_size.is_finite() && font_size > 0.0 {
        font_size
    } else {
        BASE_FONT_SIZE_PX
    };
    let letter_spacing = or_default(convert_value(styles.letter_spacing.as_ref()), 0.0);
    let decoration = styles.text_decoration.as_deref();

    Typography {
        font_family: family.primary,
        font_fallbacks: family.fallbacks,
        font_size,
        font_weight: parse_font_weight(styles.font_weight.as_ref()),
        font_style: map_font_style(styles.font_style.as_deref()),
        text_align: map_text_align(styles.text_align.as_deref()),
        line_height: parse_line_height(styles.line_height.as_ref()),
        letter_spacing: if letter_spacing.is_finite() {
            letter_spacing
        } else {
            0.0
        },
        text_case: map_text_case(styles.text_transform.as_deref()),
        text_decoration_line: parse_text_decoration_line(decoration),
        text_decoration_style: parse_text_decoration_style(decoration),
        paragraph_spacing: 0.0,
        paragraph_indent: 0.0,
        color: parse_optional_color(styles.color.as_deref()),
    }
}

fn map_font_style(raw: Option<&str>) -> FontStyle {
    match raw.map(str::trim) {
        Some("italic") | Some("oblique") => FontStyle::Italic,
        _ => FontStyle::Normal,
    }
}

pub fn map_text_align(raw: Option<&str>) -> TextAlign {
    match raw.map(str::trim) {
        Some("center") => TextAlign::Center,
        Some("right") => TextAlign::Right,
        Some("justify") => TextAlign::Justified,
        _ => TextAlign::Left,
    }
}

/// `normal` -> auto, `px` -> pixels, `%` -> percent, unitless multiplier ->
/// percent (`1.5` -> `150`). `em` lengths resolve to pixels.
pub fn parse_line_height(raw: Option<&CssValue>) -> LineHeight {
    let text = match raw {
        None => return LineHeight::Auto,
        Some(CssValue::Number(n)) if n.is_finite() => {
            return LineHeight::Percent { value: n * 100.0 }
        }
        Some(CssValue::Number(_)) => return LineHeight::Auto,
        Some(CssValue::Text(s)) => s.trim(),
    };
    if text.is_empty() || text == "normal" {
        return LineHeight::Auto;
    }

    let Some(value) = leading_number(text) else {
        return LineHeight::Auto;
    };
    if text.ends_with("px") {
        LineHeight::Pixels { value }
    } else if text.ends_with('%') {
        LineHeight::Percent { value }
    } else if text.ends_with("em") {
        LineHeight::Pixels {
            value: convert_unit(text),
        }
    } else {
        LineHeight::Percent {
            value: value * 100.0,
        }
    }
}

pub fn parse_text_decoration_line(raw: Option<&str>) -> TextDecorationLine {
    let Some(value) = raw.map(str::trim) else {
        return TextDecorationLine::None;
    };
    if value.contains("underline") {
        TextDecorationLine::Underline
    } else if value.contains("line-through") {
        TextDecorationLine::Strikethrough
    } else {
        TextDecorationLine::None
    }
}

pub fn parse_text_decoration_style(raw: Option<&str>) -> TextDecorationStyle {
    let Some(value) = raw.map(str::trim) else {
        return TextDecorationStyle::Solid;
    };
    if value.contains("dotted") {
        TextDecorationStyle::Dotted
    } else if value.contains("dashed") {
        TextDecorationStyle::Dashed
    } else if value.contains("wavy") {
        TextDecorationStyle::Wavy
    } else {
        TextDecorationStyle::Solid
    }
}

pub fn map_text_case(raw: Option<&str>) -> TextCase {
    match raw.map(str::trim) {
        Some("uppercase") => TextCase::Upper,
        Some("lowercase") => TextCase::Lower,
        Some("capitalize") => TextCase::Title,
        _ => TextCase::Original,
    }
}
