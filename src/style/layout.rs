//! Auto-layout, positioning and constraint inference.

use crate::types::{
    AbsolutePosition, ConstraintType, Constraints, CounterAxisAlign, CssValue, GridProperties,
    Layout, LayoutAlign, LayoutMode, Padding, Positioning, StyleBag,
};

use super::paint::stroke_weight;
use super::units::{
    convert_value, leading_integer, leading_number, or_default, parse_corner_radius, size_or_zero,
};

pub fn map_layout(styles: &StyleBag) -> Layout {
    Layout {
        width: size_or_zero(styles.width.as_ref()),
        height: size_or_zero(styles.height.as_ref()),
        x: offset(styles.left.as_ref()),
        y: offset(styles.top.as_ref()),
        layout_mode: map_layout_mode(styles),
        layout_align: map_layout_align(styles.justify_content.as_deref()),
        counter_axis_align: map_counter_axis_align(styles.align_items.as_deref()),
        item_spacing: size_or_zero(styles.gap.as_ref()),
        padding: Padding {
            top: size_or_zero(styles.padding.top.as_ref()),
            right: size_or_zero(styles.padding.right.as_ref()),
            bottom: size_or_zero(styles.padding.bottom.as_ref()),
            left: size_or_zero(styles.padding.left.as_ref()),
        },
        corner_radius: parse_corner_radius(styles.border.radius.as_ref()),
        stroke_weight: stroke_weight(styles),
        opacity: parse_opacity(styles.opacity.as_ref()),
        positioning: map_positioning(styles),
        z_index: parse_z_index(styles.z_index.as_ref()),
        grid_properties: (styles.display_keyword() == "grid").then(|| GridProperties {
            template_columns: styles.grid_template_columns.clone(),
            template_rows: styles.grid_template_rows.clone(),
            gap: styles.grid_gap.clone(),
            auto_flow: styles.grid_auto_flow.clone(),
        }),
        absolute_position: styles.is_out_of_flow().then(|| AbsolutePosition {
            top: offset(styles.top.as_ref()),
            right: offset(styles.right.as_ref()),
            bottom: offset(styles.bottom.as_ref()),
            left: offset(styles.left.as_ref()),
        }),
    }
}

/// A signed pixel offset; unparseable values are `0`.
fn offset(value: Option<&CssValue>) -> f32 {
    let px = or_default(convert_value(value), 0.0);
    if px.is_finite() {
        px
    } else {
        0.0
    }
}

/// Flex maps by direction; grid compares template track counts (more rows
/// than columns is vertical). Everything else is `NONE`.
pub fn map_layout_mode(styles: &StyleBag) -> LayoutMode {
    match styles.display_keyword() {
        "flex" => match styles.flex_direction.as_deref().map(str::trim) {
            Some("column") => LayoutMode::Vertical,
            _ => LayoutMode::Horizontal,
        },
        "grid" => {
            let tracks = |template: Option<&str>| {
                template
                    .map(|t| t.split_whitespace().count())
                    .filter(|count| *count > 0)
            };
            match (
                tracks(styles.grid_template_columns.as_deref()),
                tracks(styles.grid_template_rows.as_deref()),
            ) {
                (Some(cols), Some(rows)) if rows > cols => LayoutMode::Vertical,
                _ => LayoutMode::Horizontal,
            }
        }
        _ => LayoutMode::None,
    }
}

pub fn map_layout_align(justify_content: Option<&str>) -> LayoutAlign {
    match justify_content.map(str::trim) {
        Some("center") => LayoutAlign::Center,
        Some("flex-end") => LayoutAlign::Max,
        Some("space-between") => LayoutAlign::SpaceBetween,
        _ => LayoutAlign::Min,
    }
}

pub fn map_counter_axis_align(align_items: Option<&str>) -> CounterAxisAlign {
    match align_items.map(str::trim) {
        Some("center") => CounterAxisAlign::Center,
        Some("flex-end") => CounterAxisAlign::Max,
        _ => CounterAxisAlign::Min,
    }
}

pub fn map_positioning(styles: &StyleBag) -> Positioning {
    if styles.is_out_of_flow() {
        Positioning::Absolute
    } else {
        Positioning::Auto
    }
}

/// Per-axis anchoring for absolutely positioned nodes; in-flow nodes are
/// always `{MIN, MIN}`.
pub fn map_constraints(styles: &StyleBag) -> Constraints {
    if !styles.is_out_of_flow() {
        return Constraints::default();
    }
    Constraints {
        horizontal: axis_constraint(styles.left.as_ref(), styles.right.as_ref()),
        vertical: axis_constraint(styles.top.as_ref(), styles.bottom.as_ref()),
    }
}

fn axis_constraint(leading: Option<&CssValue>, trailing: Option<&CssValue>) -> ConstraintType {
    let present = |v: Option<&CssValue>| v.map(|v| !v.is_auto()).unwrap_or(false);
    match (present(leading), present(trailing)) {
        (true, true) => ConstraintType::Stretch,
        (false, true) => ConstraintType::Max,
        (true, false) => ConstraintType::Min,
        (false, false) => ConstraintType::Center,
    }
}

fn parse_z_index(value: Option<&CssValue>) -> i32 {
    let parsed = match value {
        Some(CssValue::Number(n)) if n.is_finite() => Some(*n as i64),
        Some(CssValue::Text(s)) => leading_integer(s),
        _ => None,
    };
    parsed
        .map(|z| z.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        .unwrap_or(0)
}

/// Opacity in `[0, 1]`, `1` when absent or unparseable.
pub fn parse_opacity(value: Option<&CssValue>) -> f32 {
    let parsed = match value {
        Some(CssValue::Number(n)) => Some(*n),
        Some(CssValue::Text(s)) => leading_number(s),
        None => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 1.0,
    }
}
