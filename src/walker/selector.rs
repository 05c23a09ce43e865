//! Root lookup over the host tree.
//!
//! Supports the subset of CSS selectors a traversal root needs: `*`, type,
//! `#id`, `.class`, compounds of those, and descendant combinators.

use crate::error::{H2fError, Result};
use crate::types::HostElement;

/// One compound selector, e.g. `div#main.card`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &HostElement) -> bool {
        if let Some(tag) = &self.tag {
            if !el.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|class| el.classes().any(|have| have == class))
    }
}

/// Parsed selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = || H2fError::InvalidSelector(source.to_string());
        let parts = source
            .split_whitespace()
            .map(|token| parse_compound(token).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()?;
        if parts.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// First element in document order (including `root` itself) that
    /// matches.
    pub fn find<'a>(&self, root: &'a HostElement) -> Option<&'a HostElement> {
        let mut ancestors = Vec::new();
        self.find_from(root, &mut ancestors)
    }

    fn find_from<'a>(
        &self,
        el: &'a HostElement,
        ancestors: &mut Vec<&'a HostElement>,
    ) -> Option<&'a HostElement> {
        if self.matches(el, ancestors) {
            return Some(el);
        }
        ancestors.push(el);
        for child in el.element_children() {
            if let Some(found) = self.find_from(child, ancestors) {
                return Some(found);
            }
        }
        ancestors.pop();
        None
    }

    fn matches(&self, el: &HostElement, ancestors: &[&HostElement]) -> bool {
        let Some((last, rest)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(el) {
            return false;
        }
        // Descendant-only chains can be matched greedily from the nearest
        // ancestor outwards.
        let mut remaining = ancestors.iter().rev();
        rest.iter()
            .rev()
            .all(|part| remaining.any(|ancestor| part.matches(ancestor)))
    }
}

fn parse_compound(token: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = token;

    let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
    let tag = &rest[..tag_end];
    if tag == "*" {
        // universal: no tag constraint
    } else if !tag.is_empty() {
        if !is_ident(tag) {
            return None;
        }
        compound.tag = Some(tag.to_ascii_lowercase());
    }
    rest = &rest[tag_end..];

    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['#', '.']).unwrap_or(body.len());
        let name = &body[..end];
        if !is_ident(name) {
            return None;
        }
        match marker {
            '#' if compound.id.is_none() => compound.id = Some(name.to_string()),
            '.' => compound.classes.push(name.to_string()),
            _ => return None,
        }
        rest = &body[end..];
    }

    Some(compound)
}

fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Resolve `selector` against the document root.
pub fn query_selector<'a>(root: &'a HostElement, selector: &str) -> Result<&'a HostElement> {
    let parsed = Selector::parse(selector)?;
    parsed
        .find(root)
        .ok_or_else(|| H2fError::root_not_found(selector))
}
