//! End-to-end style generation: resolve, sample, classify, build.

use std::path::PathBuf;

use rayon::prelude::*;
use raster_sampler::{sample_raster, RasterDecoder, SamplerOptions};
use serde::{Deserialize, Serialize};
use sld_common::{
    ClassValue, ClassificationMode, GeometryKind, Rgb, Sample, StyleDefaults, StyleResult,
};
use sld_protocol::{ColorMapType, StyleDocument};
use tracing::{info, warn};

use crate::builder::{categorized_style, classified_style, coverage_style, outline_style};
use crate::classify::classify;
use crate::ramp::RampSpec;

/// Style for one raster band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRequest {
    pub path: PathBuf,

    /// Defaults to the file stem of `path`.
    #[serde(default)]
    pub style_name: Option<String>,

    /// Defaults to `StyleDefaults::raster_palette`.
    #[serde(default)]
    pub ramp: Option<RampSpec>,

    #[serde(default)]
    pub mode: ClassificationMode,

    /// Interval count in range mode.
    #[serde(default)]
    pub count: Option<usize>,

    /// Defaults to `StyleDefaults::band`.
    #[serde(default)]
    pub band: Option<usize>,

    #[serde(default)]
    pub color_map_type: Option<ColorMapType>,

    /// Overrides the no-data marker stored in the raster.
    #[serde(default)]
    pub nodata: Option<f64>,
}

impl CoverageRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            style_name: None,
            ramp: None,
            mode: ClassificationMode::Range,
            count: None,
            band: None,
            color_map_type: None,
            nodata: None,
        }
    }

    pub fn with_ramp(mut self, ramp: RampSpec) -> Self {
        self.ramp = Some(ramp);
        self
    }

    pub fn with_mode(mut self, mode: ClassificationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_band(mut self, band: usize) -> Self {
        self.band = Some(band);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    pub fn with_color_map_type(mut self, kind: ColorMapType) -> Self {
        self.color_map_type = Some(kind);
        self
    }
}

/// Generates style documents with a fixed set of defaults.
///
/// Holds no mutable state; one engine can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct StyleEngine {
    defaults: StyleDefaults,
}

impl StyleEngine {
    pub fn new(defaults: StyleDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    /// Raster style for an already sampled band.
    pub fn coverage_style_from_sample(
        &self,
        name: &str,
        sample: &Sample,
        ramp: Option<&RampSpec>,
        count: Option<usize>,
        band: Option<usize>,
        color_map_type: Option<ColorMapType>,
    ) -> StyleResult<StyleDocument> {
        let resolved = self.ramp_or(ramp, &self.defaults.raster_palette).resolve()?;
        let breaks = classify(sample, &resolved, sample.mode(), count)?;
        coverage_style(
            name,
            band.unwrap_or(self.defaults.band),
            &breaks,
            color_map_type,
        )
    }

    /// Sample a raster with `decoder` and build its style.
    pub fn coverage_style<D: RasterDecoder>(
        &self,
        decoder: &D,
        request: &CoverageRequest,
    ) -> StyleResult<StyleDocument> {
        let band = request.band.unwrap_or(self.defaults.band);
        let options = SamplerOptions {
            band,
            mode: request.mode,
            nodata: request.nodata,
            ..Default::default()
        };
        let summary = sample_raster(decoder, &request.path, &options)?;

        let name = request
            .style_name
            .clone()
            .unwrap_or_else(|| summary.name.clone());

        self.coverage_style_from_sample(
            &name,
            &summary.sample,
            request.ramp.as_ref(),
            request.count,
            Some(band),
            request.color_map_type,
        )
    }

    /// Build coverage styles for many rasters on the rayon pool.
    ///
    /// Each request opens its own handle; results keep request order and
    /// one failure does not affect the others.
    pub fn coverage_styles_parallel<D>(
        &self,
        decoder: &D,
        requests: &[CoverageRequest],
    ) -> Vec<StyleResult<StyleDocument>>
    where
        D: RasterDecoder + Sync,
    {
        let results: Vec<_> = requests
            .par_iter()
            .map(|request| self.coverage_style(decoder, request))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = requests.len(), "Some coverage styles failed");
        }
        info!(total = requests.len(), failed, "Generated coverage styles");
        results
    }

    /// Single-symbol style; `color` defaults to `StyleDefaults::outline_color`.
    pub fn outline_style(
        &self,
        name: &str,
        geometry: GeometryKind,
        color: Option<Rgb>,
    ) -> StyleResult<StyleDocument> {
        outline_style(name, geometry, color.unwrap_or(self.defaults.outline_color))
    }

    /// One rule per distinct value of `attribute`.
    pub fn categorized_style<I, V>(
        &self,
        name: &str,
        attribute: &str,
        values: I,
        ramp: Option<&RampSpec>,
        geometry: GeometryKind,
    ) -> StyleResult<StyleDocument>
    where
        I: IntoIterator<Item = V>,
        V: Into<ClassValue>,
    {
        let resolved = self.ramp_or(ramp, &self.defaults.vector_palette).resolve()?;
        let sample = Sample::values(values);
        let breaks = classify(&sample, &resolved, ClassificationMode::Values, None)?;
        categorized_style(name, attribute, geometry, &breaks, &self.defaults)
    }

    /// Equal-width range rules over the values of `attribute`.
    ///
    /// `count` defaults to `StyleDefaults::class_count`.
    pub fn classified_style<I, V>(
        &self,
        name: &str,
        attribute: &str,
        values: I,
        ramp: Option<&RampSpec>,
        count: Option<usize>,
        geometry: GeometryKind,
    ) -> StyleResult<StyleDocument>
    where
        I: IntoIterator<Item = V>,
        V: Into<ClassValue>,
    {
        let resolved = self.ramp_or(ramp, &self.defaults.vector_palette).resolve()?;
        let sample = Sample::values(values);
        let count = count.unwrap_or(self.defaults.class_count);
        let breaks = classify(&sample, &resolved, ClassificationMode::Range, Some(count))?;
        classified_style(name, attribute, geometry, &breaks, &self.defaults)
    }

    fn ramp_or(&self, ramp: Option<&RampSpec>, palette: &str) -> RampSpec {
        ramp.cloned()
            .unwrap_or_else(|| RampSpec::named(palette))
    }
}
