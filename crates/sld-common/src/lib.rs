//! Common types and utilities shared across the style generation crates.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod sample;

pub use color::Rgb;
pub use config::StyleDefaults;
pub use error::{StyleError, StyleResult};
pub use geometry::GeometryKind;
pub use sample::{dedup_values, ClassValue, ClassificationMode, Sample, ValueKey};
