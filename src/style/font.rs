//! Font family and weight resolution.

use std::collections::{BTreeSet, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::types::CssValue;

use super::units::leading_integer;

/// Family used whenever nothing better is known.
pub const DEFAULT_FAMILY: &str = "Inter";

/// Web family name -> design-host family name.
const FAMILY_TABLE: &[(&str, &str)] = &[
    ("Arial", "Arial"),
    ("Helvetica", "Helvetica"),
    ("Times New Roman", "Times New Roman"),
    ("Times", "Times New Roman"),
    ("Courier New", "Courier New"),
    ("Courier", "Courier New"),
    ("Verdana", "Verdana"),
    ("Georgia", "Georgia"),
    ("Palatino", "Palatino"),
    ("Garamond", "Garamond"),
    ("Comic Sans MS", "Comic Sans MS"),
    ("Trebuchet MS", "Trebuchet MS"),
    ("Impact", "Impact"),
    ("Arial Black", "Arial Black"),
    ("Roboto", "Roboto"),
    ("Open Sans", "Open Sans"),
    ("Lato", "Lato"),
    ("Montserrat", "Montserrat"),
    ("sans-serif", DEFAULT_FAMILY),
    ("serif", "Times New Roman"),
    ("monospace", "Courier New"),
    ("cursive", "Comic Sans MS"),
    ("fantasy", "Impact"),
];

const WEIGHT_KEYWORDS: &[(&str, u16)] = &[
    ("normal", 400),
    ("bold", 700),
    ("lighter", 300),
    ("bolder", 700),
    ("thin", 100),
    ("extra-light", 200),
    ("light", 300),
    ("medium", 500),
    ("semi-bold", 600),
    ("extra-bold", 800),
    ("black", 900),
];

/// Resolved `font-family` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFamily {
    pub primary: String,
    pub fallbacks: Vec<String>,
}

/// Split a `font-family` value into its family tokens, quotes stripped.
pub fn family_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|token| token.trim().replace(['\'', '"'], ""))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Map a single family through the brand/generic table; unknown names pass
/// through unchanged.
pub fn map_family(name: &str) -> String {
    FAMILY_TABLE
        .iter()
        .find(|(web, _)| *web == name)
        .map(|(_, host)| (*host).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Resolve a `font-family` value. Empty input resolves to
/// [`DEFAULT_FAMILY`] with no fallbacks.
pub fn parse_font_family(raw: Option<&str>) -> FontFamily {
    let tokens = raw.map(family_tokens).unwrap_or_default();
    let mut mapped = tokens.iter().map(|token| map_family(token));
    let primary = mapped
        .next()
        .unwrap_or_else(|| DEFAULT_FAMILY.to_string());
    FontFamily {
        primary,
        fallbacks: mapped.collect(),
    }
}

/// Resolve `font-weight` to one of the nine canonical weights.
///
/// Keywords go through a fixed table; numbers are rounded to the nearest
/// hundred and clamped to `100..=900`. Anything else is `400`.
pub fn parse_font_weight(raw: Option<&CssValue>) -> u16 {
    let numeric = match raw {
        None => return 400,
        Some(CssValue::Number(n)) if n.is_finite() => *n as i64,
        Some(CssValue::Number(_)) => return 400,
        Some(CssValue::Text(s)) => {
            let keyword = s.trim().to_ascii_lowercase();
            if let Some((_, weight)) = WEIGHT_KEYWORDS.iter().find(|(k, _)| *k == keyword) {
                return *weight;
            }
            match leading_integer(&keyword) {
                Some(n) => n,
                None => return 400,
            }
        }
    };
    if numeric <= 0 {
        return 400;
    }
    let snapped = ((numeric.min(900) + 50) / 100) * 100;
    snapped.clamp(100, 900) as u16
}

/// Design-host style name for a canonical weight.
pub fn weight_style_name(weight: u16) -> &'static str {
    match weight {
        0..=149 => "Thin",
        150..=249 => "Extra Light",
        250..=349 => "Light",
        350..=449 => "Regular",
        450..=549 => "Medium",
        550..=649 => "Semi Bold",
        650..=749 => "Bold",
        750..=849 => "Extra Bold",
        _ => "Black",
    }
}

/// A concrete font the design host can load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    /// `Inter Regular`, the font every host is assumed to have.
    pub fn fallback() -> Self {
        Self::new(DEFAULT_FAMILY, "Regular")
    }
}

/// Memoizing font resolver owned by a single extraction run.
///
/// Requests for families outside the available set resolve to
/// [`FontName::fallback`]. Each distinct request is resolved once.
#[derive(Debug, Clone)]
pub struct FontCache {
    available: BTreeSet<String>,
    resolved: HashMap<(String, u16, bool), FontName>,
}

impl Default for FontCache {
    fn default() -> Self {
        let mut available: BTreeSet<String> =
            FAMILY_TABLE.iter().map(|(_, host)| host.to_string()).collect();
        available.insert(DEFAULT_FAMILY.to_string());
        Self {
            available,
            resolved: HashMap::new(),
        }
    }
}

impl FontCache {
    pub fn new<I, S>(available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut available: BTreeSet<String> = available.into_iter().map(Into::into).collect();
        available.insert(DEFAULT_FAMILY.to_string());
        Self {
            available,
            resolved: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, family: &str, weight: u16, italic: bool) -> FontName {
        let key = (family.to_string(), weight, italic);
        if let Some(hit) = self.resolved.get(&key) {
            return hit.clone();
        }

        let font = if self.available.contains(family) {
            let base = weight_style_name(weight);
            let style = match (italic, base) {
                (true, "Regular") => "Italic".to_string(),
                (true, base) => format!("{} Italic", base),
                (false, base) => base.to_string(),
            };
            FontName::new(family, style)
        } else {
            debug!("font: '{}' unavailable, using {}", family, DEFAULT_FAMILY);
            FontName::fallback()
        };

        self.resolved.insert(key, font.clone());
        font
    }

    /// Number of distinct requests resolved so far.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_maps_generics_and_strips_quotes() {
        let family = parse_font_family(Some("\"Helvetica Neue\", Arial, sans-serif"));
        assert_eq!(family.primary, "Helvetica Neue");
        assert_eq!(family.fallbacks, vec!["Arial", "Inter"]);

        let family = parse_font_family(Some("'Times', serif"));
        assert_eq!(family.primary, "Times New Roman");
        assert_eq!(family.fallbacks, vec!["Times New Roman"]);

        assert_eq!(parse_font_family(Some("monospace")).primary, "Courier New");
    }

    #[test]
    fn empty_family_defaults_to_inter() {
        let family = parse_font_family(None);
        assert_eq!(family.primary, "Inter");
        assert!(family.fallbacks.is_empty());
        assert_eq!(parse_font_family(Some(" , ")).primary, "Inter");
    }

    #[test]
    fn weight_keywords_and_numbers() {
        let w = |s: &str| parse_font_weight(Some(&CssValue::from(s)));
        assert_eq!(w("normal"), 400);
        assert_eq!(w("bold"), 700);
        assert_eq!(w("lighter"), 300);
        assert_eq!(w("semi-bold"), 600);
        assert_eq!(w("700"), 700);
        assert_eq!(w("650"), 700);
        assert_eq!(w("1000"), 900);
        assert_eq!(w("heavy"), 400);
        assert_eq!(w("0"), 400);
        assert_eq!(parse_font_weight(Some(&CssValue::Number(300.0))), 300);
        assert_eq!(parse_font_weight(None), 400);
    }

    #[test]
    fn weight_is_always_canonical() {
        for raw in ["1", "49", "99", "151", "449", "551", "899", "4000", "-3", "x"] {
            let weight = parse_font_weight(Some(&CssValue::from(raw)));
            assert!(
                weight % 100 == 0 && (100..=900).contains(&weight),
                "{raw} -> {weight}"
            );
        }
    }

    #[test]
    fn huge_weights_saturate_instead_of_overflowing() {
        assert_eq!(parse_font_weight(Some(&CssValue::Number(1e30))), 900);
        assert_eq!(
            parse_font_weight(Some(&CssValue::from("9223372036854775807"))),
            900
        );
    }

    #[test]
    fn cache_resolves_styles_and_falls_back() {
        let mut cache = FontCache::new(["Roboto"]);
        assert_eq!(
            cache.resolve("Roboto", 700, false),
            FontName::new("Roboto", "Bold")
        );
        assert_eq!(
            cache.resolve("Roboto", 400, true),
            FontName::new("Roboto", "Italic")
        );
        assert_eq!(
            cache.resolve("Roboto", 600, true),
            FontName::new("Roboto", "Semi Bold Italic")
        );
        assert_eq!(cache.resolve("Papyrus", 400, false), FontName::fallback());
        assert_eq!(cache.len(), 4);

        // Repeated requests hit the memo.
        cache.resolve("Papyrus", 400, false);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn default_cache_knows_table_families() {
        let mut cache = FontCache::default();
        assert!(cache.is_empty());
        assert_eq!(cache.resolve("Georgia", 100, false).style, "Thin");
    }
}
