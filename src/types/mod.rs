//! Data model shared by the translator, the walker and the transport layer.
//!
//! - [`style`] - the resolved [`StyleBag`] input for one element
//! - [`record`] - the normalized [`StyleRecord`] output
//! - [`host`] - the host snapshot tree ([`HostDocument`])
//! - [`node`] - the output tree ([`VisualNode`]) and [`NodeKind`] capability tags
//! - [`page`] - page metadata and asset inventories ([`PageData`])

pub mod host;
pub mod node;
pub mod page;
pub mod record;
pub mod style;

pub use host::{Bounds, HostChild, HostDocument, HostElement, IntrinsicSize};
pub use node::{NodeKind, StyleSections, VisualNode};
pub use page::{
    ImageAsset, PageData, PageMetadata, Position, SvgAsset, Viewport, ViewportParseError,
};
pub use record::{
    AbsolutePosition, BlendMode, ColorValue, ConstraintType, Constraints, CounterAxisAlign,
    Effect, EffectType, FontStyle, GradientStop, GridProperties, Layout, LayoutAlign, LayoutMode,
    LineHeight, Offset, Padding, Paint, Positioning, Rgb, StyleRecord, TextAlign, TextCase,
    TextDecorationLine, TextDecorationStyle, Typography,
};
pub use style::{BorderBag, BoxSides, CssValue, StyleBag};
