//! Target geometry kinds of a style document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;

/// What kind of data a style document renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
    Raster,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "point",
            GeometryKind::Line => "line",
            GeometryKind::Polygon => "polygon",
            GeometryKind::Raster => "raster",
        }
    }

    /// True for the feature (vector) kinds.
    pub fn is_vector(&self) -> bool {
        !matches!(self, GeometryKind::Raster)
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "point" | "multipoint" => Ok(GeometryKind::Point),
            "line" | "linestring" | "multilinestring" => Ok(GeometryKind::Line),
            "polygon" | "multipolygon" => Ok(GeometryKind::Polygon),
            "raster" | "coverage" => Ok(GeometryKind::Raster),
            other => Err(StyleError::invalid_parameter(
                "geometry",
                format!("unknown geometry kind '{}'", other),
            )),
        }
    }
}
