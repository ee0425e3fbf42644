//! OGC Styled Layer Descriptor documents.
//!
//! Supports:
//! - SLD 1.0.0 raster styles (`RasterSymbolizer` with a `ColorMap`)
//! - SLD 1.1.0 / Symbology Encoding feature styles (point, line, polygon rules)

pub mod document;
pub mod filter;
pub mod writer;

pub use document::{
    ColorMap, ColorMapEntry, ColorMapType, RasterStyle, StyleBody, StyleDocument, StyleRule,
    Stroke, Symbolizer,
};
pub use filter::{ComparisonOp, Filter};
pub use writer::{to_sld, SLD_CONTENT_TYPE};
