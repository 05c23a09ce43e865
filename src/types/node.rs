//! Output tree node types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::host::Bounds;
use super::record::StyleRecord;

/// The closed set of primitives the design host can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Container,
    Text,
    Vector,
    Image,
}

/// Which [`StyleRecord`] sections a node kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSections {
    pub fills: bool,
    pub strokes: bool,
    pub effects: bool,
    pub corner_radius: bool,
    pub auto_layout: bool,
    pub typography: bool,
}

const TEXT_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "a", "label"];
const VECTOR_TAGS: &[&str] = &["svg", "path", "circle", "rect"];

impl NodeKind {
    /// Classify a (case-insensitive) tag name.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        if tag == "img" {
            NodeKind::Image
        } else if TEXT_TAGS.contains(&tag.as_str()) {
            NodeKind::Text
        } else if VECTOR_TAGS.contains(&tag.as_str()) {
            NodeKind::Vector
        } else {
            NodeKind::Container
        }
    }

    pub fn sections(self) -> StyleSections {
        match self {
            NodeKind::Container => StyleSections {
                fills: true,
                strokes: true,
                effects: true,
                corner_radius: true,
                auto_layout: true,
                typography: false,
            },
            NodeKind::Text => StyleSections {
                fills: true,
                strokes: false,
                effects: true,
                corner_radius: false,
                auto_layout: false,
                typography: true,
            },
            NodeKind::Vector => StyleSections {
                fills: true,
                strokes: true,
                effects: true,
                corner_radius: false,
                auto_layout: false,
                typography: false,
            },
            NodeKind::Image => StyleSections {
                fills: true,
                strokes: true,
                effects: true,
                corner_radius: true,
                auto_layout: false,
                typography: false,
            },
        }
    }
}

/// One node of the extracted hierarchy.
///
/// Built once by the walker and handed off whole; nothing mutates it
/// after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub tag_name: String,
    pub kind: NodeKind,
    pub attributes: BTreeMap<String, String>,
    pub direct_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_record: Option<StyleRecord>,
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(VisualNode::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_tags_case_insensitively() {
        assert_eq!(NodeKind::from_tag("IMG"), NodeKind::Image);
        assert_eq!(NodeKind::from_tag("h3"), NodeKind::Text);
        assert_eq!(NodeKind::from_tag("Label"), NodeKind::Text);
        assert_eq!(NodeKind::from_tag("circle"), NodeKind::Vector);
        assert_eq!(NodeKind::from_tag("section"), NodeKind::Container);
    }

    #[test]
    fn only_text_nodes_take_typography() {
        assert!(NodeKind::Text.sections().typography);
        assert!(!NodeKind::Container.sections().typography);
        assert!(!NodeKind::Text.sections().strokes);
        assert!(NodeKind::Container.sections().auto_layout);
    }

    #[test]
    fn count_includes_descendants() {
        let leaf = |tag: &str| VisualNode {
            tag_name: tag.to_string(),
            kind: NodeKind::from_tag(tag),
            attributes: BTreeMap::new(),
            direct_text: None,
            bounds: None,
            style_record: None,
            children: vec![],
        };
        let mut root = leaf("div");
        let mut mid = leaf("p");
        mid.children.push(leaf("span"));
        root.children.push(mid);
        root.children.push(leaf("img"));
        assert_eq!(root.count(), 4);
    }
}
