//! Raster statistics sampling for style generation.
//!
//! Reads one band of a raster source and reports either its value range or
//! the distinct values present, skipping no-data cells. Decoding is behind
//! the [`RasterDecoder`] trait:
//! - [`GeoTiffDecoder`] reads GeoTIFF files with the pure-Rust `tiff` crate
//! - [`MemoryDecoder`] serves grids already held in memory

pub mod decoder;
pub mod geotiff;
pub mod memory;
pub mod sampler;

pub use decoder::{BandData, CellType, RasterDecoder, RasterHandle};
pub use geotiff::{GeoTiffDecoder, GeoTiffHandle};
pub use memory::{MemoryDecoder, MemoryRaster};
pub use sampler::{sample_raster, RasterSummary, SamplerOptions};
