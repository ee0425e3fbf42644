//! Color ramp resolution and interpolation.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sld_common::{Rgb, StyleError, StyleResult};
use tracing::debug;

use crate::palettes::get_palette;

/// Caller-supplied color ramp reference.
///
/// In JSON a ramp is a palette name (`"RdYlGn_r"`), an array of hex colors
/// (`["#ff0000", "#00ff00"]`) or an object mapping labels to colors
/// (`{"1": "#aaaaaa", "2": "#bbbbbb"}`, key order preserved).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RampSpec {
    /// Built-in palette; a trailing `_r` reverses it.
    Named(String),
    /// Two or more colors spaced evenly over `[0, 1]`.
    Colors(Vec<String>),
    /// Label to color pairs used verbatim.
    ValueMap(#[serde(with = "ordered_pairs")] Vec<(String, String)>),
}

impl RampSpec {
    pub fn named(name: impl Into<String>) -> Self {
        RampSpec::Named(name.into())
    }

    pub fn colors<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RampSpec::Colors(colors.into_iter().map(Into::into).collect())
    }

    pub fn value_map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RampSpec::ValueMap(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Resolve into a continuous ramp or a discrete color table.
    pub fn resolve(&self) -> StyleResult<ResolvedRamp> {
        resolve(self)
    }
}

impl From<&str> for RampSpec {
    fn from(name: &str) -> Self {
        RampSpec::Named(name.to_string())
    }
}

/// A point on a ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgb,
}

/// Continuous ramp: two or more stops with strictly increasing positions
/// in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    pub fn new(stops: Vec<ColorStop>) -> StyleResult<Self> {
        if stops.len() < 2 {
            return Err(StyleError::InvalidRamp(format!(
                "a continuous ramp needs at least 2 colors, got {}",
                stops.len()
            )));
        }
        for stop in &stops {
            if !(0.0..=1.0).contains(&stop.position) {
                return Err(StyleError::InvalidRamp(format!(
                    "stop position {} is outside [0, 1]",
                    stop.position
                )));
            }
        }
        if stops.windows(2).any(|w| w[0].position >= w[1].position) {
            return Err(StyleError::InvalidRamp(
                "stop positions must strictly increase".to_string(),
            ));
        }
        Ok(Self { stops })
    }

    /// Stop `i` of `n` at position `i / (n - 1)`.
    pub fn evenly_spaced(colors: Vec<Rgb>) -> StyleResult<Self> {
        let last = colors.len().saturating_sub(1).max(1) as f64;
        let stops = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| ColorStop {
                position: i as f64 / last,
                color,
            })
            .collect();
        Self::new(stops)
    }

    /// Parse hex strings and space them evenly.
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> StyleResult<Self> {
        let parsed = colors
            .iter()
            .map(|c| Rgb::from_hex(c.as_ref()))
            .collect::<StyleResult<Vec<_>>>()?;
        Self::evenly_spaced(parsed)
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn first(&self) -> Rgb {
        self.stops[0].color
    }

    pub fn last(&self) -> Rgb {
        self.stops[self.stops.len() - 1].color
    }

    /// Same ramp running from the last color to the first.
    pub fn reversed(&self) -> Self {
        let stops = self
            .stops
            .iter()
            .rev()
            .map(|s| ColorStop {
                position: 1.0 - s.position,
                color: s.color,
            })
            .collect();
        Self { stops }
    }

    /// Color at position `t`, clamped to `[0, 1]`.
    ///
    /// Channels are interpolated linearly between the bracketing stops and
    /// rounded half-up. Positions on or outside the end stops return the end
    /// colors exactly.
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if t <= hi.position {
                let local = (t - lo.position) / (hi.position - lo.position);
                return lo.color.lerp(&hi.color, local);
            }
        }

        last.color
    }

    /// `k` colors taken at `i / (k - 1)`; a single color is the first stop.
    pub fn sample(&self, k: usize) -> Vec<Rgb> {
        match k {
            0 => Vec::new(),
            1 => vec![self.first()],
            _ => (0..k)
                .map(|i| self.color_at(i as f64 / (k - 1) as f64))
                .collect(),
        }
    }
}

/// Ordered label to color table.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteColors {
    entries: Vec<(String, Rgb)>,
}

impl DiscreteColors {
    /// Build from label/hex pairs. Labels are trimmed and must be unique.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> StyleResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if pairs.is_empty() {
            return Err(StyleError::InvalidRamp("value map is empty".to_string()));
        }

        let mut entries: Vec<(String, Rgb)> = Vec::with_capacity(pairs.len());
        for (label, color) in pairs {
            let label = label.as_ref().trim().to_string();
            if entries.iter().any(|(existing, _)| *existing == label) {
                return Err(StyleError::InvalidRamp(format!(
                    "value map repeats label '{}'",
                    label
                )));
            }
            entries.push((label, Rgb::from_hex(color.as_ref())?));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<Rgb> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, color)| *color)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }
}

/// Output of ramp resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedRamp {
    Continuous(ColorRamp),
    Discrete(DiscreteColors),
}

impl ResolvedRamp {
    /// Number of stops or table entries.
    pub fn len(&self) -> usize {
        match self {
            ResolvedRamp::Continuous(ramp) => ramp.stops().len(),
            ResolvedRamp::Discrete(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve a ramp reference. Fails with `InvalidRamp` on unknown palettes,
/// too few colors or malformed hex strings.
pub fn resolve(spec: &RampSpec) -> StyleResult<ResolvedRamp> {
    let resolved = match spec {
        RampSpec::Named(name) => ResolvedRamp::Continuous(named_ramp(name)?),
        RampSpec::Colors(colors) => ResolvedRamp::Continuous(ColorRamp::from_hex(colors)?),
        RampSpec::ValueMap(pairs) => ResolvedRamp::Discrete(DiscreteColors::from_pairs(pairs)?),
    };
    debug!(stops = resolved.len(), "Resolved color ramp");
    Ok(resolved)
}

fn named_ramp(name: &str) -> StyleResult<ColorRamp> {
    let name = name.trim();
    if let Some(colors) = get_palette(name) {
        return ColorRamp::from_hex(colors);
    }

    let reversed_base = name
        .strip_suffix("_r")
        .or_else(|| name.strip_suffix("_R"));
    if let Some(colors) = reversed_base.and_then(get_palette) {
        return Ok(ColorRamp::from_hex(colors)?.reversed());
    }

    Err(StyleError::InvalidRamp(format!("unknown palette '{}'", name)))
}

/// Serde helpers keeping a JSON object's key order as a pair list.
mod ordered_pairs {
    use super::*;

    pub fn serialize<S: Serializer>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (k, v) in pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, String)>, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of labels to hex colors")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    pairs.push((k, v));
                }
                Ok(pairs)
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}
