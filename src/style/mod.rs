//! Style translator: turns a resolved [`StyleBag`] into a [`StyleRecord`].
//!
//! Every converter is a pure function of its input. Malformed values fall
//! back to the defaults documented on each converter and never surface as
//! errors, so [`translate`] is infallible.

pub mod color;
pub mod font;
pub mod layout;
pub mod paint;
pub mod shadow;
pub mod text;
pub mod units;

pub use color::parse_color;
pub use font::{parse_font_family, parse_font_weight, FontCache, FontFamily, FontName};
pub use layout::{map_constraints, map_layout, map_layout_mode};
pub use paint::{map_effects, map_fills, map_strokes, parse_gradient};
pub use shadow::{parse_box_shadow, ShadowEffect};
pub use text::{map_typography, parse_line_height};
pub use units::convert_unit;

use crate::types::{StyleBag, StyleRecord};

/// Translate one element's style bag.
pub fn translate(styles: &StyleBag) -> StyleRecord {
    StyleRecord {
        fills: map_fills(styles),
        strokes: map_strokes(styles),
        effects: map_effects(styles),
        layout: map_layout(styles),
        typography: map_typography(styles),
        constraints: map_constraints(styles),
    }
}
