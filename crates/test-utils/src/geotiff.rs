//! GeoTIFF fixture writers.
//!
//! Fixtures are plain single-image TIFFs; the only GeoTIFF-specific tag
//! written is GDAL's no-data tag, which is what the sampler reads.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tiff::encoder::colortype::{Gray32Float, Gray8, RGB32Float};
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

pub type FixtureResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Write a single-band `f32` GeoTIFF, optionally tagging a no-data value.
pub fn write_f32_geotiff(
    path: &Path,
    width: u32,
    height: u32,
    data: &[f32],
    nodata: Option<f64>,
) -> FixtureResult<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(file)?;
    let mut image = encoder.new_image::<Gray32Float>(width, height)?;
    if let Some(nodata) = nodata {
        let text = nodata.to_string();
        image
            .encoder()
            .write_tag(Tag::GdalNodata, text.as_str())?;
    }
    image.write_data(data)?;
    Ok(())
}

/// Write a single-band `u8` GeoTIFF (categorical rasters such as land cover).
pub fn write_u8_geotiff(
    path: &Path,
    width: u32,
    height: u32,
    data: &[u8],
    nodata: Option<u8>,
) -> FixtureResult<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(file)?;
    let mut image = encoder.new_image::<Gray8>(width, height)?;
    if let Some(nodata) = nodata {
        let text = nodata.to_string();
        image
            .encoder()
            .write_tag(Tag::GdalNodata, text.as_str())?;
    }
    image.write_data(data)?;
    Ok(())
}

/// Write a three-band interleaved `f32` GeoTIFF.
pub fn write_rgb_f32_geotiff(
    path: &Path,
    width: u32,
    height: u32,
    interleaved: &[f32],
) -> FixtureResult<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(file)?;
    let image = encoder.new_image::<RGB32Float>(width, height)?;
    image.write_data(interleaved)?;
    Ok(())
}

/// A temporary directory holding fixture files; removed on drop.
pub struct FixtureDir {
    dir: tempfile::TempDir,
}

impl FixtureDir {
    pub fn new() -> FixtureResult<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
