//! Host-side snapshot types.
//!
//! These mirror what the capture script (or any other host collaborator)
//! emits: the element tree in document order, with text nodes kept as
//! separate children so that direct text can be told apart from
//! descendant text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::page::Viewport;
use super::style::StyleBag;

/// A rendered page as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDocument {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub viewport: Viewport,
    /// The document element (usually `html`).
    pub root: HostElement,
}

/// Page-absolute box of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Natural pixel size of replaced content (images).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrinsicSize {
    pub width: f32,
    pub height: f32,
}

/// One element in the host tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostElement {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub styles: StyleBag,
    #[serde(default)]
    pub bounds: Option<Bounds>,
    /// Whether the host produced at least one layout box for the element.
    /// `None` when the host cannot tell.
    #[serde(default)]
    pub has_layout_box: Option<bool>,
    #[serde(default)]
    pub intrinsic_size: Option<IntrinsicSize>,
    #[serde(default)]
    pub children: Vec<HostChild>,
}

/// A child node: either an element or a run of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "lowercase")]
pub enum HostChild {
    Element(HostElement),
    Text { text: String },
}

impl HostElement {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Lower-cased tag name.
    pub fn tag(&self) -> String {
        self.tag_name.to_ascii_lowercase()
    }

    /// Element children in document order.
    pub fn element_children(&self) -> impl Iterator<Item = &HostElement> {
        self.children.iter().filter_map(|child| match child {
            HostChild::Element(el) => Some(el),
            HostChild::Text { .. } => None,
        })
    }

    /// Visit this element and every descendant element in document order.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a HostElement)) {
        visit(self);
        for child in self.element_children() {
            child.walk(visit);
        }
    }

    // Builder helpers, mostly for tests and fixtures.

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_styles(mut self, styles: StyleBag) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_child(mut self, child: HostElement) -> Self {
        self.children.push(HostChild::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(HostChild::Text { text: text.into() });
        self
    }
}
