//! In-memory rasters.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sld_common::{StyleError, StyleResult};

use crate::decoder::{check_band, BandData, CellType, RasterDecoder, RasterHandle};

/// A decoded raster held in memory, bands stored separately in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRaster {
    pub width: usize,
    pub height: usize,
    pub bands: Vec<Vec<f64>>,
    pub nodata: Option<f64>,
}

impl MemoryRaster {
    /// Single-band raster.
    pub fn single_band(width: usize, height: usize, values: Vec<f64>) -> StyleResult<Self> {
        Self::new(width, height, vec![values])
    }

    pub fn new(width: usize, height: usize, bands: Vec<Vec<f64>>) -> StyleResult<Self> {
        if bands.is_empty() {
            return Err(StyleError::UnreadableRaster("raster has no bands".to_string()));
        }
        for (i, band) in bands.iter().enumerate() {
            if band.len() != width * height {
                return Err(StyleError::UnreadableRaster(format!(
                    "band {} has {} cells, expected {}x{}",
                    i + 1,
                    band.len(),
                    width,
                    height
                )));
            }
        }
        Ok(Self {
            width,
            height,
            bands,
            nodata: None,
        })
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }
}

impl RasterHandle for MemoryRaster {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn band(&self, band: usize) -> StyleResult<BandData<'_>> {
        let idx = check_band(band, self.bands.len())?;
        Ok(BandData {
            values: &self.bands[idx],
            nodata: self.nodata,
            cell_type: CellType::Float64,
        })
    }
}

/// Decoder that serves registered in-memory rasters by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryDecoder {
    rasters: HashMap<PathBuf, MemoryRaster>,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, raster: MemoryRaster) {
        self.rasters.insert(path.into(), raster);
    }
}

impl RasterDecoder for MemoryDecoder {
    type Handle = MemoryRaster;

    fn open(&self, path: &Path) -> StyleResult<Self::Handle> {
        self.rasters
            .get(path)
            .cloned()
            .ok_or_else(|| StyleError::UnreadableRaster(format!("{}: not found", path.display())))
    }
}
