//! In-memory model of a style document.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sld_common::{GeometryKind, Rgb, StyleError, StyleResult};

use crate::filter::Filter;

/// A complete style: one named layer with one user style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDocument {
    pub name: String,
    pub geometry: GeometryKind,
    pub body: StyleBody,
}

/// Rules for feature data, or a color map for coverages.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleBody {
    Rules(Vec<StyleRule>),
    Raster(RasterStyle),
}

impl StyleDocument {
    pub fn rules(&self) -> &[StyleRule] {
        match &self.body {
            StyleBody::Rules(rules) => rules,
            StyleBody::Raster(_) => &[],
        }
    }

    pub fn color_map(&self) -> Option<&ColorMap> {
        match &self.body {
            StyleBody::Raster(raster) => Some(&raster.color_map),
            StyleBody::Rules(_) => None,
        }
    }

    /// Check the structural invariants the rendering server relies on.
    ///
    /// - raster documents carry a color map whose quantities strictly ascend
    /// - feature documents carry at least one rule
    pub fn validate(&self) -> StyleResult<()> {
        if self.name.trim().is_empty() {
            return Err(StyleError::invalid_parameter("name", "style name must not be empty"));
        }

        match (&self.body, self.geometry) {
            (StyleBody::Raster(raster), GeometryKind::Raster) => raster.color_map.validate(),
            (StyleBody::Rules(rules), kind) if kind.is_vector() => {
                if rules.is_empty() {
                    return Err(StyleError::EmptyClassification(
                        "style has no rules".to_string(),
                    ));
                }
                Ok(())
            }
            (_, kind) => Err(StyleError::invalid_parameter(
                "geometry",
                format!("body does not match geometry kind '{}'", kind),
            )),
        }
    }
}

/// Raster symbolizer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStyle {
    /// 1-based source band rendered through the gray channel.
    pub channel: usize,
    pub color_map: ColorMap,
}

/// How the renderer maps values between color map entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMapType {
    /// Interpolate between entries.
    #[default]
    Ramp,
    /// Flat color per interval.
    Intervals,
    /// Exact value matches only.
    Values,
}

impl ColorMapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMapType::Ramp => "ramp",
            ColorMapType::Intervals => "intervals",
            ColorMapType::Values => "values",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    pub kind: ColorMapType,
    pub entries: Vec<ColorMapEntry>,
}

impl ColorMap {
    /// Entries must be non-empty with strictly ascending quantities.
    pub fn validate(&self) -> StyleResult<()> {
        if self.entries.is_empty() {
            return Err(StyleError::EmptyClassification(
                "color map has no entries".to_string(),
            ));
        }

        for pair in self.entries.windows(2) {
            if pair[0].quantity.partial_cmp(&pair[1].quantity) != Some(Ordering::Less) {
                return Err(StyleError::invalid_parameter(
                    "color_map",
                    format!(
                        "quantities must strictly ascend, got {} then {}",
                        pair[0].quantity, pair[1].quantity
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorMapEntry {
    pub quantity: f64,
    pub color: Rgb,
    pub label: String,
    pub opacity: Option<f64>,
}

/// One rendering rule of a feature style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub name: String,
    pub title: Option<String>,
    pub filter: Option<Filter>,
    pub symbolizer: Symbolizer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f64,
    pub linejoin: Option<String>,
}

impl Stroke {
    pub fn new(color: Rgb, width: f64) -> Self {
        Self {
            color,
            width,
            linejoin: None,
        }
    }

    pub fn with_linejoin(mut self, linejoin: impl Into<String>) -> Self {
        self.linejoin = Some(linejoin.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbolizer {
    /// A well-known mark filled with one color.
    Point { mark: String, fill: Rgb, size: f64 },
    Line { stroke: Stroke },
    /// Omitting the fill leaves the polygon interior transparent.
    Polygon {
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
}

impl Symbolizer {
    pub fn circle(fill: Rgb, size: f64) -> Self {
        Symbolizer::Point {
            mark: "circle".to_string(),
            fill,
            size,
        }
    }

    /// Geometry kind this symbolizer draws.
    pub fn geometry(&self) -> GeometryKind {
        match self {
            Symbolizer::Point { .. } => GeometryKind::Point,
            Symbolizer::Line { .. } => GeometryKind::Line,
            Symbolizer::Polygon { .. } => GeometryKind::Polygon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(quantity: f64) -> ColorMapEntry {
        ColorMapEntry {
            quantity,
            color: Rgb::BLACK,
            label: quantity.to_string(),
            opacity: None,
        }
    }

    #[test]
    fn test_color_map_must_ascend() {
        let ok = ColorMap {
            kind: ColorMapType::Ramp,
            entries: vec![entry(0.0), entry(5.0)],
        };
        ok.validate().unwrap();

        let dup = ColorMap {
            kind: ColorMapType::Ramp,
            entries: vec![entry(0.0), entry(0.0)],
        };
        assert!(dup.validate().is_err());

        let nan = ColorMap {
            kind: ColorMapType::Values,
            entries: vec![entry(0.0), entry(f64::NAN)],
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_body_must_match_geometry() {
        let doc = StyleDocument {
            name: "dem".to_string(),
            geometry: GeometryKind::Polygon,
            body: StyleBody::Raster(RasterStyle {
                channel: 1,
                color_map: ColorMap {
                    kind: ColorMapType::Ramp,
                    entries: vec![entry(1.0)],
                },
            }),
        };
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_empty_rules_rejected() {
        let doc = StyleDocument {
            name: "roads".to_string(),
            geometry: GeometryKind::Line,
            body: StyleBody::Rules(vec![]),
        };
        assert!(matches!(
            doc.validate(),
            Err(StyleError::EmptyClassification(_))
        ));
    }
}
