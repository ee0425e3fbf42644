//! Style generation engine.
//!
//! Turns a color ramp plus either raster band statistics or a column's
//! distinct values into a style document with ordered, non-overlapping
//! classes:
//!
//! - [`ramp`] resolves palette names, color lists and value maps
//! - [`classify`] splits samples into colored class breaks
//! - [`builder`] assembles raster and feature style documents
//! - [`engine`] chains the steps, including raster sampling
//!
//! # Example
//!
//! ```
//! use sld_common::{ClassificationMode, Sample};
//! use style_engine::{classify, RampSpec};
//!
//! let ramp = RampSpec::colors(["#ff0000", "#00ff00"]).resolve().unwrap();
//! let breaks = classify(
//!     &Sample::Range { min: 0.0, max: 10.0 },
//!     &ramp,
//!     ClassificationMode::Range,
//!     Some(2),
//! )
//! .unwrap();
//! assert_eq!(breaks[1].label, "5 - 10");
//! ```

pub mod builder;
pub mod classify;
pub mod engine;
pub mod palettes;
pub mod ramp;

pub use builder::{categorized_style, classified_style, coverage_style, outline_style};
pub use classify::{classify, interval_label, Bound, ClassBreak};
pub use engine::{CoverageRequest, StyleEngine};
pub use palettes::{get_palette, palette_names};
pub use ramp::{resolve, ColorRamp, ColorStop, DiscreteColors, RampSpec, ResolvedRamp};
