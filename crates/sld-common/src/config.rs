//! Default styling parameters, passed explicitly to every generation call.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Rgb;
use crate::error::{StyleError, StyleResult};

/// Defaults applied when a generation call leaves a parameter unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    /// Stroke color of outline-only styles.
    pub outline_color: Rgb,

    /// Stroke color drawn around categorized and classified polygons.
    pub category_stroke_color: Rgb,

    /// Palette used for raster (coverage) styles.
    pub raster_palette: String,

    /// Palette used for categorized/classified vector styles.
    pub vector_palette: String,

    /// Number of classes when the caller gives none.
    pub class_count: usize,

    /// 1-based raster band sampled and rendered.
    pub band: usize,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            outline_color: Rgb::new(0x35, 0x79, 0xb1),
            category_stroke_color: Rgb::BLACK,
            raster_palette: "RdYlGn_r".to_string(),
            vector_palette: "tab20".to_string(),
            class_count: 5,
            band: 1,
        }
    }
}

impl StyleDefaults {
    /// Load defaults from environment variables, falling back to `Default`.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("STYLE_OUTLINE_COLOR") {
            if let Ok(color) = Rgb::from_hex(&val) {
                config.outline_color = color;
            }
        }

        if let Ok(val) = std::env::var("STYLE_CATEGORY_STROKE_COLOR") {
            if let Ok(color) = Rgb::from_hex(&val) {
                config.category_stroke_color = color;
            }
        }

        if let Ok(val) = std::env::var("STYLE_RASTER_PALETTE") {
            if !val.trim().is_empty() {
                config.raster_palette = val.trim().to_string();
            }
        }

        if let Ok(val) = std::env::var("STYLE_VECTOR_PALETTE") {
            if !val.trim().is_empty() {
                config.vector_palette = val.trim().to_string();
            }
        }

        if let Ok(val) = std::env::var("STYLE_CLASS_COUNT") {
            if let Ok(count) = val.parse() {
                config.class_count = count;
            }
        }

        if let Ok(val) = std::env::var("STYLE_BAND") {
            if let Ok(band) = val.parse() {
                config.band = band;
            }
        }

        config
    }

    /// Parse defaults from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> StyleResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> StyleResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StyleError::invalid_parameter("config", format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> StyleResult<()> {
        if self.class_count == 0 {
            return Err(StyleError::invalid_parameter("class_count", "must be > 0"));
        }

        if self.band == 0 {
            return Err(StyleError::invalid_parameter("band", "bands are 1-based"));
        }

        if self.raster_palette.is_empty() || self.vector_palette.is_empty() {
            return Err(StyleError::invalid_parameter("palette", "must not be empty"));
        }

        Ok(())
    }
}
