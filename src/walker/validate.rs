//! Post-assembly checks: structure and output size.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{H2fError, Result};
use crate::types::{PageData, Paint, VisualNode};

/// Default output budget (10 MiB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Structural checks on an assembled page. All problems are reported at
/// once.
pub fn validate_page_data(page: &PageData) -> Result<()> {
    let mut errors = Vec::new();

    if page.metadata.timestamp == 0 {
        errors.push("Missing metadata.timestamp".to_string());
    }
    if page.metadata.version.trim().is_empty() {
        errors.push("Missing metadata.version".to_string());
    }
    if page.tree.tag_name.trim().is_empty() {
        errors.push("Tree root missing tagName".to_string());
    }
    check_node(&page.tree, &mut String::new(), &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(H2fError::InvalidData(errors))
    }
}

fn check_node(node: &VisualNode, path: &mut String, errors: &mut Vec<String>) {
    let len = path.len();
    if !path.is_empty() {
        path.push_str(" > ");
    }
    path.push_str(&node.tag_name);

    if let Some(record) = &node.style_record {
        let layout = &record.layout;
        if !layout.width.is_finite() || !layout.height.is_finite() {
            errors.push(format!("layout size must be finite at {}", path));
        }
        let colors = record
            .typography
            .color
            .iter()
            .map(|c| c.opacity)
            .chain(record.effects.iter().map(|e| e.color.opacity))
            .chain(
                record
                    .fills
                    .iter()
                    .chain(record.strokes.iter())
                    .flat_map(paint_opacities),
            );
        for opacity in colors {
            if !(0.0..=1.0).contains(&opacity) {
                errors.push(format!("opacity out of range at {}", path));
            }
        }
    }
    for child in &node.children {
        if child.tag_name.trim().is_empty() {
            errors.push(format!("child missing tagName under {}", path));
        }
        check_node(child, path, errors);
    }

    path.truncate(len);
}

fn paint_opacities(paint: &Paint) -> Vec<f32> {
    match paint {
        Paint::Solid { opacity, .. } => vec![*opacity],
        Paint::GradientLinear { gradient_stops, .. } => {
            gradient_stops.iter().map(|stop| stop.opacity).collect()
        }
    }
}

/// Serialized size of an assembled page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeReport {
    pub size_bytes: usize,
    pub max_bytes: usize,
}

/// Measure the page as JSON and compare it against `max_bytes`.
///
/// Exceeding the budget is reported as [`H2fError::OversizeResult`]; the
/// page itself is left untouched so the caller can still decide to use it.
pub fn check_output_size(page: &PageData, max_bytes: usize) -> Result<SizeReport> {
    let size_bytes = serde_json::to_vec(page)?.len();
    debug!(
        "size: {:.2} MB of {:.2} MB budget",
        size_bytes as f64 / 1024.0 / 1024.0,
        max_bytes as f64 / 1024.0 / 1024.0
    );
    if size_bytes > max_bytes {
        return Err(H2fError::OversizeResult {
            size_bytes,
            max_bytes,
        });
    }
    Ok(SizeReport {
        size_bytes,
        max_bytes,
    })
}
