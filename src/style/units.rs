//! Length and number parsing.
//!
//! `convert_unit` resolves a CSS length string to pixels. The `auto`,
//! `none` and empty sentinels resolve to `0`; a string with no numeric
//! prefix resolves to `NaN` and the call site decides the fallback
//! (see [`or_default`]).

use crate::types::CssValue;

/// Base font size used for `em`/`rem`. Ancestor font sizes are not tracked.
pub const BASE_FONT_SIZE_PX: f32 = 16.0;

/// Resolve a length string to pixels.
///
/// - `px` and unitless numbers pass through
/// - `em`/`rem` multiply by [`BASE_FONT_SIZE_PX`]
/// - `%` returns the bare percentage; resolving it against a parent box is
///   the caller's job
pub fn convert_unit(raw: &str) -> f32 {
    let value = raw.trim();
    if value.is_empty() || value == "auto" || value == "none" {
        return 0.0;
    }

    let num = leading_number(value).unwrap_or(f32::NAN);
    if value.ends_with("px") {
        num
    } else if value.ends_with("em") {
        // also covers `rem`
        num * BASE_FONT_SIZE_PX
    } else {
        num
    }
}

/// [`convert_unit`] over an optional host value; numbers pass through.
pub fn convert_value(value: Option<&CssValue>) -> f32 {
    value.map(CssValue::to_px).unwrap_or(0.0)
}

/// Replace `NaN` and zero with `default`, the way `value || default` reads
/// at the call sites that need a non-zero fallback.
pub fn or_default(value: f32, default: f32) -> f32 {
    if value.is_nan() || value == 0.0 {
        default
    } else {
        value
    }
}

/// Resolve an optional value to a finite pixel length, `0` when unusable.
pub fn length_or_zero(value: Option<&CssValue>) -> f32 {
    let px = convert_value(value);
    if px.is_finite() {
        px
    } else {
        0.0
    }
}

/// Like [`length_or_zero`] but clamps negatives to zero, for sizes that
/// cannot be offsets (width, padding, radius).
pub fn size_or_zero(value: Option<&CssValue>) -> f32 {
    length_or_zero(value).max(0.0)
}

/// Parse the leading floating-point number of `s`, ignoring any trailing
/// text (`"12.5px"` -> `12.5`). Returns `None` when there is no numeric
/// prefix at all.
pub fn leading_number(s: &str) -> Option<f32> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when it is followed by at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f32>().ok()
}

/// Parse the leading integer of `s` (`"10"` -> `10`, `"1.9"` -> `1`).
pub fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}

/// Corner radius from `border-radius`; only the first radius is used.
pub fn parse_corner_radius(radius: Option<&CssValue>) -> f32 {
    match radius {
        None => 0.0,
        Some(CssValue::Number(n)) if n.is_finite() => n.max(0.0),
        Some(CssValue::Number(_)) => 0.0,
        Some(CssValue::Text(s)) => {
            let s = s.trim();
            if s.is_empty() || s == "0px" {
                return 0.0;
            }
            leading_number(s).map(|v| v.max(0.0)).unwrap_or(0.0)
        }
    }
}
