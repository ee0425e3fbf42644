//! Raster decoder abstraction.

use std::path::Path;

use sld_common::{StyleError, StyleResult};

/// Opens raster sources.
///
/// Implementations must be read-only: opening and sampling a source never
/// modifies it. Each call to [`open`](RasterDecoder::open) returns an
/// independent handle, so concurrent callers should each open their own.
pub trait RasterDecoder {
    type Handle: RasterHandle;

    fn open(&self, path: &Path) -> StyleResult<Self::Handle>;
}

/// Storage type the cells were decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    Integer,
    Float32,
    #[default]
    Float64,
}

impl CellType {
    /// Round a no-data marker to the precision of the stored cells.
    ///
    /// `-3.4e38` tagged on a Float32 band must match the cells, which hold
    /// the nearest `f32`.
    pub fn nodata_marker(self, nodata: f64) -> f64 {
        match self {
            CellType::Float32 => nodata as f32 as f64,
            CellType::Integer | CellType::Float64 => nodata,
        }
    }
}

/// One band's cell values plus its no-data marker.
#[derive(Debug, Clone, Copy)]
pub struct BandData<'a> {
    pub values: &'a [f64],
    pub nodata: Option<f64>,
    pub cell_type: CellType,
}

impl<'a> BandData<'a> {
    /// Whether a cell holds real data.
    ///
    /// NaN is never valid; the no-data marker is honored only when
    /// `skip_nodata` is set.
    pub fn is_valid(&self, value: f64, skip_nodata: bool) -> bool {
        if value.is_nan() {
            return false;
        }
        match self.nodata {
            Some(nodata) if skip_nodata => value != self.cell_type.nodata_marker(nodata),
            _ => true,
        }
    }

    /// Iterate the valid cells of the band.
    pub fn valid_values(&self, skip_nodata: bool) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .copied()
            .filter(move |v| self.is_valid(*v, skip_nodata))
    }

    /// Minimum and maximum over the valid cells, `None` when there are none.
    pub fn range(&self, skip_nodata: bool) -> Option<(f64, f64)> {
        let (min, max) = self.valid_values(skip_nodata).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), v| (min.min(v), max.max(v)),
        );
        (min <= max).then_some((min, max))
    }

    /// Distinct valid values in ascending order. No-data cells are excluded.
    pub fn distinct(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self.valid_values(true).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        values
    }
}

/// An opened raster source. Bands are numbered from 1.
pub trait RasterHandle {
    fn band_count(&self) -> usize;

    /// Borrow the cells of a band. `band` is 1-based.
    fn band(&self, band: usize) -> StyleResult<BandData<'_>>;

    /// Minimum and maximum of a band.
    fn band_stats(&self, band: usize, skip_nodata: bool) -> StyleResult<(f64, f64)> {
        self.band(band)?
            .range(skip_nodata)
            .ok_or_else(|| no_valid_cells(band))
    }

    /// Distinct valid values of a band in ascending order.
    fn distinct_values(&self, band: usize) -> StyleResult<Vec<f64>> {
        let values = self.band(band)?.distinct();
        if values.is_empty() {
            return Err(no_valid_cells(band));
        }
        Ok(values)
    }
}

pub(crate) fn no_valid_cells(band: usize) -> StyleError {
    StyleError::UnreadableRaster(format!("band {} has no valid cells", band))
}

/// Check a 1-based band index against the number of bands.
pub(crate) fn check_band(band: usize, band_count: usize) -> StyleResult<usize> {
    if band == 0 || band > band_count {
        return Err(StyleError::UnreadableRaster(format!(
            "band {} out of range (raster has {} band{})",
            band,
            band_count,
            if band_count == 1 { "" } else { "s" }
        )));
    }
    Ok(band - 1)
}
