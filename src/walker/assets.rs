//! Page-wide inventories: images, inline SVGs and font families.
//!
//! These scan the whole host document, not just the traversal root.

use image::ImageFormat;

use crate::style::font::{family_tokens, FontCache, FontName};
use crate::types::{
    CssValue, FontStyle, HostChild, HostElement, ImageAsset, Position, SvgAsset, VisualNode,
};

use super::is_visible;

pub fn collect_images(root: &HostElement) -> Vec<ImageAsset> {
    let mut images = Vec::new();
    root.walk(&mut |el| {
        if el.tag() != "img" || !is_visible(el) {
            return;
        }
        let Some(src) = el.attr("src").filter(|src| !src.is_empty()) else {
            return;
        };
        let bounds = el.bounds.unwrap_or_default();
        let natural = |intrinsic: Option<f32>, attr: &str, display: f32| {
            intrinsic
                .filter(|v| *v > 0.0)
                .or_else(|| {
                    el.attr(attr)
                        .and_then(|v| v.trim().parse::<f32>().ok())
                        .filter(|v| *v > 0.0)
                })
                .unwrap_or(display)
        };
        images.push(ImageAsset {
            src: src.to_string(),
            alt: el.attr("alt").unwrap_or_default().to_string(),
            width: natural(el.intrinsic_size.map(|s| s.width), "width", bounds.width),
            height: natural(el.intrinsic_size.map(|s| s.height), "height", bounds.height),
            display_width: bounds.width,
            display_height: bounds.height,
            position: Position {
                x: bounds.x,
                y: bounds.y,
            },
            object_fit: el.styles.object_fit.clone(),
            object_position: el.styles.object_position.clone(),
            is_data_url: src.starts_with("data:"),
            format: image_format(src),
        });
    });
    images
}

pub fn collect_svgs(root: &HostElement) -> Vec<SvgAsset> {
    let mut svgs = Vec::new();
    root.walk(&mut |el| {
        if el.tag() != "svg" || !is_visible(el) {
            return;
        }
        let bounds = el.bounds.unwrap_or_default();
        let dimension = |attr: &str, display: f32| {
            el.attr(attr)
                .filter(|v| !v.is_empty())
                .map(CssValue::from)
                .unwrap_or(CssValue::Number(display))
        };
        svgs.push(SvgAsset {
            markup: serialize_markup(el),
            view_box: el.attr("viewBox").map(str::to_string),
            width: dimension("width", bounds.width),
            height: dimension("height", bounds.height),
            display_width: bounds.width,
            display_height: bounds.height,
            position: Position {
                x: bounds.x,
                y: bounds.y,
            },
            fill: el.styles.fill.clone(),
            stroke: el.styles.stroke.clone(),
            stroke_width: el.styles.stroke_width.clone(),
        });
    });
    svgs
}

/// Every font-family token used anywhere in the document, first-seen order.
pub fn collect_fonts(root: &HostElement) -> Vec<String> {
    let mut fonts: Vec<String> = Vec::new();
    root.walk(&mut |el| {
        if let Some(family) = el.styles.font_family.as_deref() {
            for token in family_tokens(family) {
                if !fonts.contains(&token) {
                    fonts.push(token);
                }
            }
        }
    });
    fonts
}

/// Format label for an image source: `PNG`, `JPEG`, `GIF`, `WEBP`, `SVG`
/// or `UNKNOWN`. Data URLs report their declared subtype.
pub fn image_format(src: &str) -> String {
    if let Some(rest) = src.strip_prefix("data:image/") {
        let subtype = rest.split([';', ',']).next().unwrap_or_default();
        if subtype.is_empty() {
            return "UNKNOWN".to_string();
        }
        return format_label(subtype).unwrap_or_else(|| subtype.to_ascii_uppercase());
    }

    let path = src
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    path.rsplit_once('.')
        .filter(|(_, ext)| !ext.contains('/'))
        .and_then(|(_, ext)| format_label(ext))
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

fn format_label(ext: &str) -> Option<String> {
    let ext = ext.to_ascii_lowercase();
    if ext == "svg" || ext == "svg+xml" {
        return Some("SVG".to_string());
    }
    let label = match ImageFormat::from_extension(&ext)? {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Gif => "GIF",
        ImageFormat::WebP => "WEBP",
        _ => return None,
    };
    Some(label.to_string())
}

/// Serialize an element subtree as markup (`outerHTML`-style).
pub fn serialize_markup(element: &HostElement) -> String {
    let mut out = String::new();
    write_markup(element, &mut out);
    out
}

fn write_markup(element: &HostElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag_name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    out.push('>');
    for child in &element.children {
        match child {
            HostChild::Element(el) => write_markup(el, out),
            HostChild::Text { text } => escape_into(text, false, out),
        }
    }
    out.push_str("</");
    out.push_str(&element.tag_name);
    out.push('>');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

/// Fonts the design host has to load for the text nodes of `tree`,
/// first-seen order.
pub fn resolve_fonts(tree: &VisualNode, cache: &mut FontCache) -> Vec<FontName> {
    let mut fonts = Vec::new();
    collect_font_names(tree, cache, &mut fonts);
    fonts
}

fn collect_font_names(node: &VisualNode, cache: &mut FontCache, fonts: &mut Vec<FontName>) {
    if node.kind.sections().typography {
        if let Some(record) = &node.style_record {
            let typo = &record.typography;
            let font = cache.resolve(
                &typo.font_family,
                typo.font_weight,
                typo.font_style == FontStyle::Italic,
            );
            if !fonts.contains(&font) {
                fonts.push(font);
            }
        }
    }
    for child in &node.children {
        collect_font_names(child, cache, fonts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bounds, IntrinsicSize, StyleBag};
    use crate::walker::{traverse, ExtractOptions};

    #[test]
    fn image_formats_from_urls_and_data() {
        assert_eq!(image_format("https://cdn.example.com/a/logo.PNG"), "PNG");
        assert_eq!(image_format("/img/photo.jpeg?w=200#x"), "JPEG");
        assert_eq!(image_format("/img/photo.jpg"), "JPEG");
        assert_eq!(image_format("anim.gif"), "GIF");
        assert_eq!(image_format("pic.webp"), "WEBP");
        assert_eq!(image_format("icon.svg"), "SVG");
        assert_eq!(image_format("https://example.com/image"), "UNKNOWN");
        assert_eq!(image_format("https://example.com.au/image"), "UNKNOWN");
        assert_eq!(image_format("data:image/png;base64,AAAA"), "PNG");
        assert_eq!(image_format("data:image/svg+xml;utf8,<svg/>"), "SVG");
        assert_eq!(image_format("data:image/avif;base64,AAAA"), "AVIF");
    }

    fn doc() -> HostElement {
        HostElement::new("body")
            .with_styles(StyleBag {
                font_family: Some("\"Open Sans\", Arial, sans-serif".into()),
                ..StyleBag::default()
            })
            .with_child(
                HostElement::new("img")
                    .with_attr("src", "https://example.com/hero.webp")
                    .with_attr("alt", "Hero")
                    .with_attr("width", "800")
                    .with_bounds(Bounds {
                        x: 10.0,
                        y: 20.0,
                        width: 400.0,
                        height: 300.0,
                    }),
            )
            .with_child({
                let mut img = HostElement::new("img").with_attr("src", "data:image/png;base64,AA");
                img.intrinsic_size = Some(IntrinsicSize {
                    width: 64.0,
                    height: 32.0,
                });
                img
            })
            .with_child(HostElement::new("img"))
            .with_child(
                HostElement::new("svg")
                    .with_attr("viewBox", "0 0 24 24")
                    .with_attr("width", "24")
                    .with_child(HostElement::new("path").with_attr("d", "M0 0h24v24H0z"))
                    .with_bounds(Bounds {
                        x: 0.0,
                        y: 0.0,
                        width: 24.0,
                        height: 48.0,
                    }),
            )
            .with_child(HostElement::new("p").with_styles(StyleBag {
                font_family: Some("Arial, Georgia".into()),
                ..StyleBag::default()
            }))
    }

    #[test]
    fn images_carry_natural_and_display_sizes() {
        let images = collect_images(&doc());
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].width, 800.0);
        assert_eq!(images[0].height, 300.0);
        assert_eq!(images[0].display_width, 400.0);
        assert_eq!(images[0].position, Position { x: 10.0, y: 20.0 });
        assert_eq!(images[0].format, "WEBP");
        assert!(!images[0].is_data_url);
        assert_eq!(images[1].width, 64.0);
        assert!(images[1].is_data_url);
        assert_eq!(images[1].alt, "");
    }

    #[test]
    fn svgs_carry_markup_and_dimensions() {
        let svgs = collect_svgs(&doc());
        assert_eq!(svgs.len(), 1);
        let svg = &svgs[0];
        assert_eq!(svg.view_box.as_deref(), Some("0 0 24 24"));
        assert_eq!(svg.width, CssValue::from("24"));
        assert_eq!(svg.height, CssValue::Number(48.0));
        assert!(svg.markup.starts_with("<svg "));
        assert!(svg.markup.contains("<path d=\"M0 0h24v24H0z\"></path>"));
        assert!(svg.markup.ends_with("</svg>"));
    }

    #[test]
    fn fonts_are_unique_in_first_seen_order() {
        assert_eq!(
            collect_fonts(&doc()),
            vec!["Open Sans", "Arial", "sans-serif", "Georgia"]
        );
    }

    #[test]
    fn markup_escapes_text_and_attributes() {
        let el = HostElement::new("text")
            .with_attr("title", "a \"b\" & c")
            .with_text("1 < 2");
        assert_eq!(
            serialize_markup(&el),
            "<text title=\"a &quot;b&quot; &amp; c\">1 &lt; 2</text>"
        );
    }

    #[test]
    fn resolves_fonts_for_text_nodes_only() {
        let tree = traverse(&doc(), 0, &ExtractOptions::default()).unwrap();
        let mut cache = FontCache::default();
        let fonts = resolve_fonts(&tree, &mut cache);
        assert_eq!(fonts, vec![FontName::new("Arial", "Regular")]);
    }
}
