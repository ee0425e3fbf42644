//! Turns class breaks into style documents.

use sld_common::{ClassValue, GeometryKind, Rgb, StyleDefaults, StyleError, StyleResult};
use sld_protocol::{
    ColorMap, ColorMapEntry, ColorMapType, Filter, RasterStyle, StyleBody, StyleDocument,
    StyleRule, Stroke, Symbolizer,
};
use tracing::info;

use crate::classify::{Bound, ClassBreak};

/// Rule name of outline-only styles.
pub const SINGLE_SYMBOL: &str = "Single symbol";

const OUTLINE_POINT_SIZE: f64 = 8.0;
const OUTLINE_LINE_WIDTH: f64 = 3.0;
const OUTLINE_POLYGON_WIDTH: f64 = 0.26;

const CATEGORY_POINT_SIZE: f64 = 5.0;
const CATEGORY_LINE_WIDTH: f64 = 1.0;
const CATEGORY_POLYGON_WIDTH: f64 = 0.5;

const CLASSIFIED_STROKE_WIDTH: f64 = 1.0;
const CLASSIFIED_LINEJOIN: &str = "bevel";

/// Raster style: one color map entry per break on `band`.
///
/// The color map type defaults to `ramp` for interval breaks and `values`
/// for exact breaks. Entry quantities are the break thresholds and must
/// strictly ascend.
pub fn coverage_style(
    name: &str,
    band: usize,
    breaks: &[ClassBreak],
    kind: Option<ColorMapType>,
) -> StyleResult<StyleDocument> {
    if band == 0 {
        return Err(StyleError::invalid_parameter("band", "bands are numbered from 1"));
    }
    let first = breaks.first().ok_or_else(|| {
        StyleError::EmptyClassification("no class breaks to style".to_string())
    })?;

    let kind = kind.unwrap_or(if first.is_interval() {
        ColorMapType::Ramp
    } else {
        ColorMapType::Values
    });

    let entries = breaks
        .iter()
        .map(|b| {
            let quantity = b.threshold().ok_or_else(|| {
                StyleError::invalid_parameter(
                    "values",
                    format!("raster classes must be numeric, got '{}'", b.label),
                )
            })?;
            Ok(ColorMapEntry {
                quantity,
                color: b.color,
                label: b.label.clone(),
                opacity: None,
            })
        })
        .collect::<StyleResult<Vec<_>>>()?;

    let doc = StyleDocument {
        name: name.to_string(),
        geometry: GeometryKind::Raster,
        body: StyleBody::Raster(RasterStyle {
            channel: band,
            color_map: ColorMap { kind, entries },
        }),
    };
    doc.validate()?;

    info!(style = %name, entries = breaks.len(), color_map = kind.as_str(), "Built coverage style");
    Ok(doc)
}

/// Single-rule style drawing every feature with `color`.
pub fn outline_style(name: &str, geometry: GeometryKind, color: Rgb) -> StyleResult<StyleDocument> {
    let symbolizer = match geometry {
        GeometryKind::Point => Symbolizer::circle(color, OUTLINE_POINT_SIZE),
        GeometryKind::Line => Symbolizer::Line {
            stroke: Stroke::new(color, OUTLINE_LINE_WIDTH),
        },
        GeometryKind::Polygon => Symbolizer::Polygon {
            fill: None,
            stroke: Some(Stroke::new(color, OUTLINE_POLYGON_WIDTH)),
        },
        GeometryKind::Raster => return Err(vector_only(geometry)),
    };

    let rule = StyleRule {
        name: SINGLE_SYMBOL.to_string(),
        title: None,
        filter: None,
        symbolizer,
    };

    finish_rules(name, geometry, vec![rule])
}

/// One `attribute == value` rule per exact break.
pub fn categorized_style(
    name: &str,
    attribute: &str,
    geometry: GeometryKind,
    breaks: &[ClassBreak],
    defaults: &StyleDefaults,
) -> StyleResult<StyleDocument> {
    if !geometry.is_vector() {
        return Err(vector_only(geometry));
    }
    check_attribute(attribute)?;

    let rules = breaks
        .iter()
        .map(|b| {
            let value = match &b.bound {
                Bound::Exact(value) => value.clone(),
                Bound::Interval { .. } => {
                    return Err(StyleError::invalid_parameter(
                        "breaks",
                        "categorized styles need one break per value",
                    ))
                }
            };

            let symbolizer = match geometry {
                GeometryKind::Point => Symbolizer::circle(b.color, CATEGORY_POINT_SIZE),
                GeometryKind::Line => Symbolizer::Line {
                    stroke: Stroke::new(b.color, CATEGORY_LINE_WIDTH),
                },
                _ => Symbolizer::Polygon {
                    fill: Some(b.color),
                    stroke: Some(Stroke::new(
                        defaults.category_stroke_color,
                        CATEGORY_POLYGON_WIDTH,
                    )),
                },
            };

            Ok(StyleRule {
                name: b.label.clone(),
                title: Some(b.label.clone()),
                filter: Some(Filter::equal_to(attribute, value)),
                symbolizer,
            })
        })
        .collect::<StyleResult<Vec<_>>>()?;

    finish_rules(name, geometry, rules)
}

/// One range rule per interval break; polygons only.
pub fn classified_style(
    name: &str,
    attribute: &str,
    geometry: GeometryKind,
    breaks: &[ClassBreak],
    defaults: &StyleDefaults,
) -> StyleResult<StyleDocument> {
    if geometry != GeometryKind::Polygon {
        return Err(StyleError::invalid_parameter(
            "geometry",
            format!("classified styles support polygons only, got '{}'", geometry),
        ));
    }
    check_attribute(attribute)?;

    let stroke = Stroke::new(defaults.category_stroke_color, CLASSIFIED_STROKE_WIDTH)
        .with_linejoin(CLASSIFIED_LINEJOIN);

    let rules = breaks
        .iter()
        .map(|b| match b.bound {
            Bound::Interval {
                lower,
                upper,
                inclusive_upper,
            } => Ok(StyleRule {
                name: b.label.clone(),
                title: Some(b.label.clone()),
                filter: Some(Filter::within(attribute, lower, upper, inclusive_upper)),
                symbolizer: Symbolizer::Polygon {
                    fill: Some(b.color),
                    stroke: Some(stroke.clone()),
                },
            }),
            Bound::Exact(_) => Err(StyleError::invalid_parameter(
                "breaks",
                "classified styles need interval breaks",
            )),
        })
        .collect::<StyleResult<Vec<_>>>()?;

    finish_rules(name, geometry, rules)
}

fn finish_rules(
    name: &str,
    geometry: GeometryKind,
    rules: Vec<StyleRule>,
) -> StyleResult<StyleDocument> {
    let count = rules.len();
    let doc = StyleDocument {
        name: name.to_string(),
        geometry,
        body: StyleBody::Rules(rules),
    };
    doc.validate()?;

    info!(style = %name, geometry = %geometry, rules = count, "Built feature style");
    Ok(doc)
}

fn check_attribute(attribute: &str) -> StyleResult<()> {
    if attribute.trim().is_empty() {
        return Err(StyleError::invalid_parameter(
            "attribute",
            "attribute name must not be empty",
        ));
    }
    Ok(())
}

fn vector_only(geometry: GeometryKind) -> StyleError {
    StyleError::invalid_parameter(
        "geometry",
        format!("expected point, line or polygon, got '{}'", geometry),
    )
}

/// Literal a categorized rule compares against.
pub fn rule_value(rule: &StyleRule) -> Option<&ClassValue> {
    match &rule.filter {
        Some(Filter::Compare { literal, .. }) => Some(literal),
        _ => None,
    }
}
