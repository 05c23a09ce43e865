//! Tree walker: host snapshot in, [`VisualNode`] tree out.
//!
//! The walk is a plain recursive descent in document order. Each element's
//! inclusion is decided once from its own computed state; hidden elements
//! and everything beneath them are pruned, never replaced by placeholders.

pub mod assets;
pub mod selector;
pub mod validate;

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{sanitize_url, H2fError, Result};
use crate::output::H2F_OUTPUT_VERSION;
use crate::style;
use crate::types::{HostChild, HostDocument, HostElement, NodeKind, PageData, PageMetadata, VisualNode};

pub use assets::{collect_fonts, collect_images, collect_svgs, image_format, resolve_fonts};
pub use selector::{query_selector, Selector};
pub use validate::{check_output_size, validate_page_data, SizeReport};

pub const DEFAULT_MAX_DEPTH: usize = 50;
pub const DEFAULT_SELECTOR: &str = "body";

/// Options recognized by the walker. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    pub max_depth: usize,
    pub include_hidden: bool,
    pub compute_styles: bool,
    pub selector: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_hidden: false,
            compute_styles: true,
            selector: DEFAULT_SELECTOR.to_string(),
        }
    }
}

/// Rendering check: `display`, `visibility`, `opacity`, and the host's
/// layout-box report when it has one.
pub fn is_visible(element: &HostElement) -> bool {
    let styles = &element.styles;
    if styles.display_keyword() == "none" {
        return false;
    }
    if styles.visibility.as_deref().map(str::trim) == Some("hidden") {
        return false;
    }
    if style::layout::parse_opacity(styles.opacity.as_ref()) == 0.0 {
        return false;
    }
    element.has_layout_box != Some(false)
}

/// Concatenated text of the element's own text children, trimmed.
pub fn direct_text(element: &HostElement) -> Option<String> {
    let text: String = element
        .children
        .iter()
        .filter_map(|child| match child {
            HostChild::Text { text } => Some(text.as_str()),
            HostChild::Element(_) => None,
        })
        .collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Walk `element` at `depth`. Returns `None` when the element is deeper
/// than `max_depth` or (unless `include_hidden`) not visible.
pub fn traverse(element: &HostElement, depth: usize, options: &ExtractOptions) -> Option<VisualNode> {
    if depth > options.max_depth {
        return None;
    }
    if !options.include_hidden && !is_visible(element) {
        debug!("walk: pruned hidden <{}> at depth {}", element.tag(), depth);
        return None;
    }

    let tag_name = element.tag();
    let style_record = options
        .compute_styles
        .then(|| style::translate(&element.styles));

    let children = element
        .element_children()
        .filter_map(|child| traverse(child, depth + 1, options))
        .collect();

    Some(VisualNode {
        kind: NodeKind::from_tag(&tag_name),
        tag_name,
        attributes: element.attributes.clone(),
        direct_text: direct_text(element),
        bounds: element.bounds,
        style_record,
        children,
    })
}

/// Number of nodes in an extracted tree.
pub fn count_nodes(tree: &VisualNode) -> usize {
    tree.count()
}

/// Resolve the root, walk it, and gather page-wide inventories.
pub fn extract_page_data(document: &HostDocument, options: &ExtractOptions) -> Result<PageData> {
    let root = query_selector(&document.root, &options.selector)?;
    let tree = traverse(root, 0, options).ok_or_else(|| {
        warn!(
            "walk: root '{}' is not rendered on {}",
            options.selector,
            document
                .url
                .as_deref()
                .map(sanitize_url)
                .unwrap_or_else(|| "<snapshot>".to_string())
        );
        H2fError::root_not_found(options.selector.clone())
    })?;

    let page = PageData {
        metadata: PageMetadata {
            url: document.url.clone(),
            title: document.title.clone(),
            timestamp: now_millis(),
            viewport: document.viewport,
            version: H2F_OUTPUT_VERSION.to_string(),
        },
        images: collect_images(&document.root),
        svgs: collect_svgs(&document.root),
        fonts: collect_fonts(&document.root),
        tree,
    };

    info!(
        "walk: extracted {} nodes ({} images, {} svgs, {} fonts)",
        count_nodes(&page.tree),
        page.images.len(),
        page.svgs.len(),
        page.fonts.len()
    );
    Ok(page)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
