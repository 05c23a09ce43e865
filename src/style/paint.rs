//! Fills, strokes and effects.

use crate::types::{BlendMode, CssValue, Effect, EffectType, GradientStop, Paint, Rgb, StyleBag};

use super::color::{parse_color, parse_optional_color};
use super::shadow::parse_box_shadow;
use super::units::{convert_value, or_default};

/// Identity transform for linear gradients.
pub const IDENTITY_TRANSFORM: [[f32; 3]; 2] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// The computed `background-color` of an element with no background.
const NO_BACKGROUND: &str = "rgba(0,0,0,0)";

/// Approximate a `linear-gradient(...)` as a two-stop black to white ramp.
/// Stop colors and angles are not read; other gradient kinds are `None`.
pub fn parse_gradient(raw: &str) -> Option<Paint> {
    if !raw.contains("linear-gradient") {
        return None;
    }
    Some(Paint::GradientLinear {
        gradient_stops: vec![
            GradientStop {
                position: 0.0,
                color: Rgb::BLACK,
                opacity: 1.0,
            },
            GradientStop {
                position: 1.0,
                color: Rgb::WHITE,
                opacity: 1.0,
            },
        ],
        gradient_transform: IDENTITY_TRANSFORM,
    })
}

pub fn map_fills(styles: &StyleBag) -> Vec<Paint> {
    let mut fills = Vec::new();

    if let Some(background) = styles.background_color.as_deref() {
        let compact: String = background.chars().filter(|c| !c.is_whitespace()).collect();
        if compact != NO_BACKGROUND {
            if let Some(color) = parse_color(background) {
                fills.push(Paint::solid(color));
            }
        }
    }

    if let Some(image) = styles.background_image.as_deref() {
        if image.contains("gradient") {
            fills.extend(parse_gradient(image));
        }
    }

    fills
}

/// True when the border shorthand describes a drawn border.
fn has_border(width: Option<&CssValue>) -> bool {
    match width {
        None => false,
        Some(CssValue::Number(n)) => *n != 0.0,
        Some(CssValue::Text(s)) => {
            let s = s.trim();
            !s.is_empty() && s != "0px"
        }
    }
}

pub fn map_strokes(styles: &StyleBag) -> Vec<Paint> {
    if !has_border(styles.border.width.as_ref()) {
        return Vec::new();
    }
    parse_optional_color(styles.border.color.as_deref())
        .map(Paint::solid)
        .into_iter()
        .collect()
}

/// Border width carried next to the strokes; `1` when a border exists but
/// its width does not parse, `0` without a border.
pub fn stroke_weight(styles: &StyleBag) -> f32 {
    if !has_border(styles.border.width.as_ref()) {
        return 0.0;
    }
    let weight = or_default(convert_value(styles.border.width.as_ref()), 1.0);
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    }
}

pub fn map_effects(styles: &StyleBag) -> Vec<Effect> {
    let Some(shadow) = styles.box_shadow.as_deref() else {
        return Vec::new();
    };
    parse_box_shadow(shadow)
        .into_iter()
        .map(|shadow| Effect {
            effect_type: if shadow.inset {
                EffectType::InnerShadow
            } else {
                EffectType::DropShadow
            },
            color: shadow.color,
            offset: shadow.offset,
            radius: shadow.blur,
            spread: shadow.spread,
            visible: true,
            blend_mode: BlendMode::Normal,
        })
        .collect()
}
