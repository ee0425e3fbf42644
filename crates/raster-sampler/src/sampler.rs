//! Band sampling: turns a raster source into classification input.

use std::path::Path;

use sld_common::{ClassValue, ClassificationMode, Sample, StyleResult};
use tracing::{debug, info};

use crate::decoder::{no_valid_cells, RasterDecoder, RasterHandle};

/// What to sample and how.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerOptions {
    /// 1-based band index.
    pub band: usize,

    /// Range statistics or distinct values.
    pub mode: ClassificationMode,

    /// Exclude cells equal to the no-data marker from range statistics.
    /// Distinct values always exclude them.
    pub skip_nodata: bool,

    /// Overrides the no-data marker declared by the source.
    pub nodata: Option<f64>,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            band: 1,
            mode: ClassificationMode::Range,
            skip_nodata: true,
            nodata: None,
        }
    }
}

impl SamplerOptions {
    pub fn range(band: usize) -> Self {
        Self {
            band,
            ..Default::default()
        }
    }

    pub fn values(band: usize) -> Self {
        Self {
            band,
            mode: ClassificationMode::Values,
            ..Default::default()
        }
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }
}

/// Result of sampling one raster band.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSummary {
    /// File stem of the source, the default style name.
    pub name: String,

    /// Band that was sampled.
    pub band: usize,

    pub sample: Sample,
}

impl RasterSummary {
    /// Class count suggested by an integer-valued range: `max - min + 1`.
    ///
    /// `None` for value samples, for ranges with fractional bounds and for
    /// spans too wide to count.
    pub fn integer_class_hint(&self) -> Option<usize> {
        match self.sample {
            Sample::Range { min, max } if min.fract() == 0.0 && max.fract() == 0.0 => {
                let span = max - min;
                if span >= usize::MAX as f64 {
                    return None;
                }
                (span as usize).checked_add(1)
            }
            _ => None,
        }
    }
}

/// Open `path` with `decoder` and sample one band.
///
/// Performs a single blocking read of the source. Fails with
/// `UnreadableRaster` when the source cannot be decoded, the band does not
/// exist or the band has no valid cells.
pub fn sample_raster<D: RasterDecoder>(
    decoder: &D,
    path: &Path,
    options: &SamplerOptions,
) -> StyleResult<RasterSummary> {
    let handle = decoder.open(path)?;
    let mut data = handle.band(options.band)?;
    if options.nodata.is_some() {
        data.nodata = options.nodata;
    }

    let sample = match options.mode {
        ClassificationMode::Range => {
            let (min, max) = data
                .range(options.skip_nodata)
                .ok_or_else(|| no_valid_cells(options.band))?;
            Sample::Range { min, max }
        }
        ClassificationMode::Values => {
            let values = data.distinct();
            if values.is_empty() {
                return Err(no_valid_cells(options.band));
            }
            Sample::Values(values.into_iter().map(ClassValue::Number).collect())
        }
    };

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.split('.').next().unwrap_or(s).to_string())
        .unwrap_or_default();

    match &sample {
        Sample::Range { min, max } => {
            info!(path = %path.display(), band = options.band, min, max, "Sampled raster range");
        }
        Sample::Values(values) => {
            info!(
                path = %path.display(),
                band = options.band,
                distinct = values.len(),
                "Sampled raster values"
            );
        }
    }
    debug!(nodata = ?data.nodata, skip_nodata = options.skip_nodata, "Sampler options");

    Ok(RasterSummary {
        name,
        band: options.band,
        sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDecoder, MemoryRaster};
    use sld_common::StyleError;

    fn decoder_with(path: &str, raster: MemoryRaster) -> MemoryDecoder {
        let mut decoder = MemoryDecoder::new();
        decoder.insert(path, raster);
        decoder
    }

    #[test]
    fn test_range_sample() {
        let raster = MemoryRaster::single_band(2, 2, vec![-9999.0, 1.5, 7.0, 3.0])
            .unwrap()
            .with_nodata(-9999.0);
        let decoder = decoder_with("/data/slope.tif", raster);

        let summary =
            sample_raster(&decoder, Path::new("/data/slope.tif"), &SamplerOptions::default())
                .unwrap();
        assert_eq!(summary.name, "slope");
        assert_eq!(summary.sample, Sample::Range { min: 1.5, max: 7.0 });
        assert_eq!(summary.integer_class_hint(), None);
    }

    #[test]
    fn test_values_sample() {
        let raster = MemoryRaster::single_band(3, 2, vec![4.0, 2.0, 4.0, 0.0, 2.0, 9.0])
            .unwrap()
            .with_nodata(0.0);
        let decoder = decoder_with("landcover.tif", raster);

        let summary =
            sample_raster(&decoder, Path::new("landcover.tif"), &SamplerOptions::values(1))
                .unwrap();
        assert_eq!(
            summary.sample,
            Sample::Values(vec![
                ClassValue::Number(2.0),
                ClassValue::Number(4.0),
                ClassValue::Number(9.0)
            ])
        );
    }

    #[test]
    fn test_nodata_override() {
        let raster = MemoryRaster::single_band(3, 1, vec![0.0, 5.0, 10.0]).unwrap();
        let decoder = decoder_with("a.tif", raster);

        let options = SamplerOptions::range(1).with_nodata(10.0);
        let summary = sample_raster(&decoder, Path::new("a.tif"), &options).unwrap();
        assert_eq!(summary.sample, Sample::Range { min: 0.0, max: 5.0 });
        assert_eq!(summary.integer_class_hint(), Some(6));
    }

    #[test]
    fn test_class_hint_of_huge_span() {
        let summary = RasterSummary {
            name: "wide".to_string(),
            band: 1,
            sample: Sample::Range { min: 0.0, max: 1e20 },
        };
        assert_eq!(summary.integer_class_hint(), None);

        let summary = RasterSummary {
            sample: Sample::Range { min: -1e308, max: 1e308 },
            ..summary
        };
        assert_eq!(summary.integer_class_hint(), None);

        let summary = RasterSummary {
            sample: Sample::Range { min: 7.0, max: 7.0 },
            ..summary
        };
        assert_eq!(summary.integer_class_hint(), Some(1));
    }

    #[test]
    fn test_multi_dot_name_uses_first_segment() {
        let raster = MemoryRaster::single_band(1, 1, vec![1.0]).unwrap();
        let decoder = decoder_with("dem.v2.tif", raster);
        let summary =
            sample_raster(&decoder, Path::new("dem.v2.tif"), &SamplerOptions::default()).unwrap();
        assert_eq!(summary.name, "dem");
    }

    #[test]
    fn test_empty_band_fails() {
        let raster = MemoryRaster::single_band(2, 1, vec![f64::NAN, f64::NAN]).unwrap();
        let decoder = decoder_with("void.tif", raster);

        for options in [SamplerOptions::range(1), SamplerOptions::values(1)] {
            let err = sample_raster(&decoder, Path::new("void.tif"), &options).unwrap_err();
            assert!(matches!(err, StyleError::UnreadableRaster(_)));
        }
    }
}
