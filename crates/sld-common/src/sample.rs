//! Classification inputs: values, samples and the mode that selects between them.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StyleError, StyleResult};

/// A single attribute or raster value that can be classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassValue {
    Number(f64),
    Text(String),
}

impl ClassValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ClassValue::Number(v) => Some(*v),
            ClassValue::Text(_) => None,
        }
    }

    /// Total order used when sorting numeric value sets.
    pub fn numeric_cmp(&self, other: &ClassValue) -> Option<Ordering> {
        Some(self.as_f64()?.total_cmp(&other.as_f64()?))
    }

    /// Hashable identity. `0.0` and `-0.0` share a key, as do all NaNs.
    pub fn key(&self) -> ValueKey {
        match self {
            ClassValue::Number(v) if *v == 0.0 => ValueKey::Number(0.0_f64.to_bits()),
            ClassValue::Number(v) if v.is_nan() => ValueKey::Number(f64::NAN.to_bits()),
            ClassValue::Number(v) => ValueKey::Number(v.to_bits()),
            ClassValue::Text(s) => ValueKey::Text(s.clone()),
        }
    }
}

/// See [`ClassValue::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Number(u64),
    Text(String),
}

/// Drop repeated values in one pass; the first occurrence wins.
pub fn dedup_values<I>(values: I) -> Vec<ClassValue>
where
    I: IntoIterator<Item = ClassValue>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.key()))
        .collect()
}

impl fmt::Display for ClassValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassValue::Number(v) => write!(f, "{}", v),
            ClassValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ClassValue {
    fn from(v: f64) -> Self {
        ClassValue::Number(v)
    }
}

impl From<i64> for ClassValue {
    fn from(v: i64) -> Self {
        ClassValue::Number(v as f64)
    }
}

impl From<&str> for ClassValue {
    fn from(v: &str) -> Self {
        ClassValue::Text(v.to_string())
    }
}

impl From<String> for ClassValue {
    fn from(v: String) -> Self {
        ClassValue::Text(v)
    }
}

/// Whether classification works on a value range or on distinct values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Equal-width intervals over `[min, max]`.
    #[default]
    Range,
    /// One class per distinct value.
    Values,
}

impl FromStr for ClassificationMode {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "range" | "ramp" => Ok(ClassificationMode::Range),
            "values" => Ok(ClassificationMode::Values),
            other => Err(StyleError::invalid_parameter(
                "mode",
                format!("expected 'range' or 'values', got '{}'", other),
            )),
        }
    }
}

/// Sampler output consumed by the classification engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sample {
    Range { min: f64, max: f64 },
    Values(Vec<ClassValue>),
}

impl Sample {
    /// Build a range sample, checking `min <= max` and finiteness.
    pub fn range(min: f64, max: f64) -> StyleResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(StyleError::invalid_parameter(
                "range",
                format!("bounds must be finite, got [{}, {}]", min, max),
            ));
        }
        if min > max {
            return Err(StyleError::invalid_parameter(
                "range",
                format!("min {} is greater than max {}", min, max),
            ));
        }
        Ok(Sample::Range { min, max })
    }

    /// Build a value sample, dropping repeated values (first occurrence wins).
    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ClassValue>,
    {
        Sample::Values(dedup_values(values.into_iter().map(Into::into)))
    }

    pub fn mode(&self) -> ClassificationMode {
        match self {
            Sample::Range { .. } => ClassificationMode::Range,
            Sample::Values(_) => ClassificationMode::Values,
        }
    }
}
