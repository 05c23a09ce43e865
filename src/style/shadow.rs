//! `box-shadow` parsing.
//!
//! Only the first shadow of a comma-separated list is translated.

use serde::{Deserialize, Serialize};

use crate::types::{ColorValue, Offset, Rgb};

use super::color::parse_color;
use super::units::leading_number;

/// Color used when a shadow clause carries no parseable color.
pub const DEFAULT_SHADOW_COLOR: ColorValue = ColorValue {
    rgb: Rgb::BLACK,
    opacity: 0.25,
};

/// One translated shadow clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowEffect {
    pub inset: bool,
    pub offset: Offset,
    pub blur: f32,
    pub spread: f32,
    pub color: ColorValue,
}

/// Parse a `box-shadow` value: `[inset] <x>px <y>px <blur>px [<spread>px] <color>`.
///
/// The color may come before or after the lengths (computed styles put it
/// first). Returns an empty list for `none`, empty and non-matching input.
pub fn parse_box_shadow(raw: &str) -> Vec<ShadowEffect> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "none" {
        return Vec::new();
    }
    let Some(clause) = split_top_level(raw, ',').into_iter().next() else {
        return Vec::new();
    };

    let mut inset = false;
    let mut lengths = Vec::new();
    let mut color_tokens = Vec::new();
    let mut lengths_closed = false;

    for token in split_top_level(clause, ' ') {
        if token == "inset" {
            inset = true;
            continue;
        }
        match px_length(token) {
            Some(px) if !lengths_closed => lengths.push(px),
            // Lengths must be contiguous.
            Some(_) => return Vec::new(),
            None => {
                if !lengths.is_empty() {
                    lengths_closed = true;
                }
                color_tokens.push(token);
            }
        }
    }

    let (x, y, blur, spread) = match lengths[..] {
        [x, y, blur] => (x, y, blur, 0.0),
        [x, y, blur, spread] => (x, y, blur, spread),
        _ => return Vec::new(),
    };
    if blur < 0.0 {
        return Vec::new();
    }

    let color = parse_color(&color_tokens.join(" ")).unwrap_or(DEFAULT_SHADOW_COLOR);
    vec![ShadowEffect {
        inset,
        offset: Offset { x, y },
        blur,
        spread,
        color,
    }]
}

/// `"-2px"` -> `-2.0`; anything that is not a plain pixel length is `None`.
fn px_length(token: &str) -> Option<f32> {
    let number = token.strip_suffix("px")?;
    let value = leading_number(number)?;
    let well_formed = number
        .trim_start_matches(['-', '+'])
        .bytes()
        .all(|b| b.is_ascii_digit() || b == b'.');
    well_formed.then_some(value)
}

/// Split on `sep` outside parentheses, dropping empty pieces.
fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in input.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(input[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_drop_shadow() {
        let shadows = parse_box_shadow("2px 2px 4px rgba(0,0,0,0.5)");
        assert_eq!(shadows.len(), 1);
        let s = &shadows[0];
        assert!(!s.inset);
        assert_eq!(s.offset, Offset { x: 2.0, y: 2.0 });
        assert_eq!(s.blur, 4.0);
        assert_eq!(s.spread, 0.0);
        assert_eq!(s.color.opacity, 0.5);
    }

    #[test]
    fn invalid_input_yields_nothing() {
        assert!(parse_box_shadow("invalid").is_empty());
        assert!(parse_box_shadow("none").is_empty());
        assert!(parse_box_shadow("").is_empty());
        assert!(parse_box_shadow("2px 2px red").is_empty());
        assert!(parse_box_shadow("2px 2px -4px red").is_empty());
    }

    #[test]
    fn inset_spread_and_negative_offsets() {
        let shadows = parse_box_shadow("inset -3px 5px 10px 2px #ff0000");
        let s = &shadows[0];
        assert!(s.inset);
        assert_eq!(s.offset, Offset { x: -3.0, y: 5.0 });
        assert_eq!(s.spread, 2.0);
        assert_eq!(s.color.rgb.r, 1.0);
    }

    #[test]
    fn computed_style_order_puts_color_first() {
        let shadows = parse_box_shadow("rgba(0, 0, 0, 0.2) 0px 4px 6px -1px");
        assert_eq!(shadows.len(), 1);
        let s = &shadows[0];
        assert_eq!(s.offset, Offset { x: 0.0, y: 4.0 });
        assert_eq!(s.blur, 6.0);
        assert_eq!(s.spread, -1.0);
        assert!((s.color.opacity - 0.2).abs() < 1e-6);
    }

    #[test]
    fn only_first_shadow_is_used() {
        let shadows =
            parse_box_shadow("rgba(0, 0, 0, 0.1) 0px 1px 3px 0px, rgba(0, 0, 0, 0.06) 0px 1px 2px 0px");
        assert_eq!(shadows.len(), 1);
        assert_eq!(shadows[0].blur, 3.0);
    }

    #[test]
    fn missing_color_falls_back_to_translucent_black() {
        let shadows = parse_box_shadow("1px 1px 2px");
        assert_eq!(shadows[0].color, DEFAULT_SHADOW_COLOR);
        let shadows = parse_box_shadow("1px 1px 2px chartreuse");
        assert_eq!(shadows[0].color, DEFAULT_SHADOW_COLOR);
    }
}
