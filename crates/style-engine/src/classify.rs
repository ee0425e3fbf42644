//! Classification of samples into colored breaks.

use std::cmp::Ordering;

use sld_common::{
    dedup_values, ClassValue, ClassificationMode, Rgb, Sample, StyleError, StyleResult,
};
use tracing::{debug, warn};

use crate::ramp::{ColorRamp, DiscreteColors, ResolvedRamp};

/// What a break covers.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// `[lower, upper)`, or `[lower, upper]` when `inclusive_upper`.
    Interval {
        lower: f64,
        upper: f64,
        inclusive_upper: bool,
    },
    /// A single category value.
    Exact(ClassValue),
}

/// One class of a classification: its extent, color and legend label.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBreak {
    pub bound: Bound,
    pub color: Rgb,
    pub label: String,
}

impl ClassBreak {
    /// Whether `value` falls into this break.
    ///
    /// Intervals only hold numbers. Exact breaks compare numbers numerically
    /// and everything else by text.
    pub fn contains(&self, value: &ClassValue) -> bool {
        match &self.bound {
            Bound::Interval {
                lower,
                upper,
                inclusive_upper,
            } => match value.as_f64() {
                Some(v) if *inclusive_upper => *lower <= v && v <= *upper,
                Some(v) => *lower <= v && v < *upper,
                None => false,
            },
            Bound::Exact(exact) => match (exact.as_f64(), value.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => exact.to_string() == value.to_string(),
            },
        }
    }

    /// Threshold used for raster color map entries: the lower bound of an
    /// interval or the numeric value of an exact break.
    pub fn threshold(&self) -> Option<f64> {
        match &self.bound {
            Bound::Interval { lower, .. } => Some(*lower),
            Bound::Exact(value) => value.as_f64(),
        }
    }

    pub fn is_interval(&self) -> bool {
        matches!(self.bound, Bound::Interval { .. })
    }
}

/// Legend text for an interval.
pub fn interval_label(lower: f64, upper: f64) -> String {
    format!("{} - {}", lower, upper)
}

/// Classify `sample` with `ramp`.
///
/// - `Range` mode splits `[min, max]` into `count` equal-width intervals
///   (default: ramp stops minus one). A value sample in range mode uses the
///   extent of its numeric values.
/// - `Values` mode gives every distinct value its own break. `count` is
///   ignored.
///
/// Breaks come back in ascending order for intervals and numeric values,
/// insertion order for text values.
pub fn classify(
    sample: &Sample,
    ramp: &ResolvedRamp,
    mode: ClassificationMode,
    count: Option<usize>,
) -> StyleResult<Vec<ClassBreak>> {
    if count == Some(0) {
        return Err(StyleError::invalid_parameter(
            "count",
            "class count must be greater than zero",
        ));
    }

    let breaks = match (mode, sample) {
        (ClassificationMode::Range, Sample::Range { min, max }) => {
            classify_range(*min, *max, ramp, count)?
        }
        (ClassificationMode::Range, Sample::Values(values)) => {
            let (min, max) = numeric_extent(values)?;
            classify_range(min, max, ramp, count)?
        }
        (ClassificationMode::Values, Sample::Values(values)) => {
            if count.is_some() {
                debug!(?count, "Class count ignored in values mode");
            }
            classify_values(values, ramp)?
        }
        (ClassificationMode::Values, Sample::Range { .. }) => {
            return Err(StyleError::invalid_parameter(
                "mode",
                "values mode needs a list of distinct values, got a range",
            ));
        }
    };

    debug!(mode = ?mode, breaks = breaks.len(), "Classified sample");
    Ok(breaks)
}

fn numeric_extent(values: &[ClassValue]) -> StyleResult<(f64, f64)> {
    if values.is_empty() {
        return Err(StyleError::EmptyClassification(
            "no values to classify".to_string(),
        ));
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        let v = value.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
            StyleError::invalid_parameter(
                "mode",
                format!("range mode needs finite numbers, got '{}'", value),
            )
        })?;
        min = min.min(v);
        max = max.max(v);
    }
    Ok((min, max))
}

fn classify_range(
    min: f64,
    max: f64,
    ramp: &ResolvedRamp,
    count: Option<usize>,
) -> StyleResult<Vec<ClassBreak>> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(StyleError::invalid_parameter(
            "range",
            format!("invalid range [{}, {}]", min, max),
        ));
    }

    match ramp {
        ResolvedRamp::Continuous(ramp) => {
            let n = count.unwrap_or(ramp.stops().len() - 1).max(1);
            equal_intervals(min, max, n, ramp)
        }
        ResolvedRamp::Discrete(table) => table_intervals(min, max, table, count),
    }
}

/// Boundaries `b_i = min + (max - min) * i / n` with both ends exact.
///
/// When `max - min` overflows, the step is taken from the scaled bounds.
fn boundaries(min: f64, max: f64, n: usize) -> Vec<f64> {
    let width = max - min;
    let step = max / n as f64 - min / n as f64;
    (0..=n)
        .map(|i| match i {
            0 => min,
            i if i == n => max,
            i if width.is_finite() => min + width * i as f64 / n as f64,
            i => min + step * i as f64,
        })
        .collect()
}

fn equal_intervals(min: f64, max: f64, n: usize, ramp: &ColorRamp) -> StyleResult<Vec<ClassBreak>> {
    if min == max {
        return Ok(vec![ClassBreak {
            bound: Bound::Interval {
                lower: min,
                upper: max,
                inclusive_upper: true,
            },
            color: ramp.first(),
            label: interval_label(min, max),
        }]);
    }

    let bounds = boundaries(min, max, n);
    check_increasing(&bounds, n)?;
    let colors = ramp.sample(n);

    Ok(bounds
        .windows(2)
        .zip(colors)
        .enumerate()
        .map(|(i, (pair, color))| ClassBreak {
            bound: Bound::Interval {
                lower: pair[0],
                upper: pair[1],
                inclusive_upper: i == n - 1,
            },
            color,
            label: interval_label(pair[0], pair[1]),
        })
        .collect())
}

/// Range classification with an explicit table: one interval per entry,
/// colors and labels taken verbatim.
fn table_intervals(
    min: f64,
    max: f64,
    table: &DiscreteColors,
    count: Option<usize>,
) -> StyleResult<Vec<ClassBreak>> {
    let n = table.len();
    if let Some(requested) = count {
        if requested != n {
            return Err(StyleError::RampSizeMismatch {
                expected: requested,
                actual: n,
            });
        }
    }

    if min == max {
        if n != 1 {
            return Err(StyleError::RampSizeMismatch {
                expected: 1,
                actual: n,
            });
        }
        let (label, color) = table
            .iter()
            .next()
            .ok_or_else(|| StyleError::InvalidRamp("value map is empty".to_string()))?;
        return Ok(vec![ClassBreak {
            bound: Bound::Interval {
                lower: min,
                upper: max,
                inclusive_upper: true,
            },
            color,
            label: label.to_string(),
        }]);
    }

    let bounds = boundaries(min, max, n);
    check_increasing(&bounds, n)?;

    Ok(bounds
        .windows(2)
        .zip(table.iter())
        .enumerate()
        .map(|(i, (pair, (label, color)))| ClassBreak {
            bound: Bound::Interval {
                lower: pair[0],
                upper: pair[1],
                inclusive_upper: i == n - 1,
            },
            color,
            label: label.to_string(),
        })
        .collect())
}

fn check_increasing(bounds: &[f64], n: usize) -> StyleResult<()> {
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(StyleError::invalid_parameter(
            "count",
            format!(
                "range [{}, {}] is too narrow for {} classes",
                bounds[0],
                bounds[bounds.len() - 1],
                n
            ),
        ));
    }
    Ok(())
}

fn classify_values(values: &[ClassValue], ramp: &ResolvedRamp) -> StyleResult<Vec<ClassBreak>> {
    let values = ordered_distinct(values)?;
    let k = values.len();

    match ramp {
        ResolvedRamp::Continuous(ramp) => Ok(values
            .into_iter()
            .zip(ramp.sample(k))
            .map(|(value, color)| exact_break(value, color))
            .collect()),
        ResolvedRamp::Discrete(table) => {
            if table.len() != k {
                return Err(StyleError::RampSizeMismatch {
                    expected: k,
                    actual: table.len(),
                });
            }

            let colors: Vec<Rgb> = values
                .iter()
                .filter_map(|value| table.get(&value.to_string()))
                .collect();
            if colors.len() != k {
                return Err(StyleError::RampSizeMismatch {
                    expected: k,
                    actual: colors.len(),
                });
            }

            Ok(values
                .into_iter()
                .zip(colors)
                .map(|(value, color)| exact_break(value, color))
                .collect())
        }
    }
}

fn exact_break(value: ClassValue, color: Rgb) -> ClassBreak {
    ClassBreak {
        label: value.to_string(),
        bound: Bound::Exact(value),
        color,
    }
}

/// Drop repeats (first occurrence wins) and sort numeric-only sets
/// ascending. Mixed or text sets keep insertion order.
fn ordered_distinct(values: &[ClassValue]) -> StyleResult<Vec<ClassValue>> {
    if values.is_empty() {
        return Err(StyleError::EmptyClassification(
            "no distinct values to classify".to_string(),
        ));
    }

    let mut distinct = dedup_values(values.iter().cloned());
    if distinct.len() < values.len() {
        warn!(
            dropped = values.len() - distinct.len(),
            "Dropped repeated classification values"
        );
    }

    if distinct.iter().all(|v| v.as_f64().is_some()) {
        distinct.sort_by(|a, b| a.numeric_cmp(b).unwrap_or(Ordering::Equal));
    }

    Ok(distinct)
}
