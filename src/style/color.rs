//! CSS color parsing.
//!
//! [`parse_color`] is the only place color strings are normalized; fills,
//! strokes, shadows and text color all go through it.

use palette::Srgb;

use crate::types::{ColorValue, Rgb};

use super::units::leading_number;

/// Keyword colors understood without a full CSS table.
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::BLACK),
    ("white", Rgb::WHITE),
    (
        "red",
        Rgb {
            r: 1.0,
            g: 0.0,
            b: 0.0,
        },
    ),
    (
        "green",
        Rgb {
            r: 0.0,
            g: 0.5,
            b: 0.0,
        },
    ),
    (
        "blue",
        Rgb {
            r: 0.0,
            g: 0.0,
            b: 1.0,
        },
    ),
];

/// Parse a CSS color.
///
/// Recognized, in order: `transparent` (-> `None`), `rgb()`/`rgba()` with
/// integer channels, `#rrggbb`/`#rgb`, and a handful of keywords.
/// Anything else is `None`; malformed input never errors.
pub fn parse_color(raw: &str) -> Option<ColorValue> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("transparent") {
        return None;
    }

    if let Some(color) = parse_rgb_function(value) {
        return Some(color);
    }

    if let Some(color) = parse_hex(value) {
        return Some(color);
    }

    let lowered = value.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, rgb)| ColorValue::opaque(*rgb))
}

/// Parse an optional color string.
pub fn parse_optional_color(raw: Option<&str>) -> Option<ColorValue> {
    raw.and_then(parse_color)
}

/// Find the first well-formed `rgb(...)`/`rgba(...)` call anywhere in the
/// string (shadow values embed the color after the lengths).
fn parse_rgb_function(value: &str) -> Option<ColorValue> {
    let mut search = value;
    while let Some(idx) = search.find("rgb") {
        let rest = &search[idx + 3..];
        let rest = rest.strip_prefix('a').unwrap_or(rest);
        if let Some(args) = rest.strip_prefix('(') {
            if let Some(close) = args.find(')') {
                if let Some(color) = parse_rgb_args(&args[..close]) {
                    return Some(color);
                }
            }
        }
        search = &search[idx + 3..];
    }
    None
}

fn parse_rgb_args(args: &str) -> Option<ColorValue> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |part: &str| -> Option<u8> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u32 = part.parse().ok()?;
        Some(value.min(255) as u8)
    };

    let srgb = Srgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    let opacity = match parts.get(3) {
        Some(alpha) => {
            if alpha.is_empty() || !alpha.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
                return None;
            }
            leading_number(alpha)?.clamp(0.0, 1.0)
        }
        None => 1.0,
    };

    Some(ColorValue {
        rgb: to_unit_rgb(srgb),
        opacity,
    })
}

fn parse_hex(value: &str) -> Option<ColorValue> {
    let digits = value.strip_prefix('#')?;
    if !matches!(digits.len(), 3 | 6) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let srgb: Srgb<u8> = digits.parse().ok()?;
    Some(ColorValue::opaque(to_unit_rgb(srgb)))
}

fn to_unit_rgb(srgb: Srgb<u8>) -> Rgb {
    let unit: Srgb<f32> = srgb.into_format();
    Rgb {
        r: unit.red,
        g: unit.green,
        b: unit.blue,
    }
}
