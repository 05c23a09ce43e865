//! HTML to Figma (h2f) Library
//!
//! Turns a rendered page, as seen by a browser, into a design-tool-ready
//! tree. Each visible element becomes a [`VisualNode`] whose computed CSS is
//! normalized into a [`StyleRecord`] of fills, strokes, effects, auto-layout,
//! typography and constraints.
//!
//! # Module Overview
//!
//! - [`types`] - Host snapshot input, style records, visual tree and page data
//! - [`style`] - Pure CSS-to-design-primitive converters
//! - [`walker`] - Root lookup, tree walk, asset inventories and validation
//! - [`browser`] - Headless capture of live pages (async boundary)
//! - [`output`] - Versioned JSON output envelope
//! - [`transport`] - Delivery of output to stdout or a file
//! - [`config`] - Configuration file support
//!
//! # Example
//!
//! ```no_run
//! use h2f_lib::{check_output_size, extract_page_data, ExtractOptions, HostDocument};
//!
//! # fn example(raw: &str) -> h2f_lib::Result<()> {
//! let document: HostDocument = serde_json::from_str(raw)?;
//! let page = extract_page_data(&document, &ExtractOptions::default())?;
//! let report = check_output_size(&page, 10 * 1024 * 1024)?;
//! println!("{} bytes", report.size_bytes);
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod output;
pub mod style;
pub mod transport;
pub mod types;
pub mod walker;

pub use browser::{capture_page, CaptureOptions, MOCK_CAPTURE_ENV};
pub use config::Config;
pub use error::{sanitize_url, ErrorCode, ErrorPayload, H2fError, Result};
pub use output::{
    ErrorOutput, ExtractOutput, ExtractStats, H2fOutput, SourceDescriptor, SourceKind,
    H2F_OUTPUT_VERSION,
};
pub use style::{translate, FontCache, FontName};
pub use transport::{deliver, deliver_text, Delivery, Sink};
pub use types::{
    HostDocument, HostElement, NodeKind, PageData, StyleBag, StyleRecord, Viewport, VisualNode,
};
pub use walker::{
    check_output_size, count_nodes, extract_page_data, query_selector, resolve_fonts, traverse,
    validate_page_data, ExtractOptions, SizeReport,
};
