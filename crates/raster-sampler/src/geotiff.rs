//! GeoTIFF decoding backed by the pure-Rust `tiff` crate.
//!
//! Only the first image directory is read. Pixel-interleaved (chunky)
//! samples are split into bands at open time, so a handle owns its data and
//! can be sampled any number of times without touching the file again.

use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use sld_common::{StyleError, StyleResult};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::{debug, warn};

use crate::decoder::{check_band, BandData, CellType, RasterDecoder, RasterHandle};

/// File extensions accepted as GeoTIFF.
const VALID_EXTENSIONS: &[&str] = &["tif", "tiff", "gtiff"];

/// Decoder for single-image GeoTIFF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTiffDecoder;

impl GeoTiffDecoder {
    pub fn new() -> Self {
        Self
    }
}

/// A decoded GeoTIFF image.
#[derive(Debug, Clone)]
pub struct GeoTiffHandle {
    pub width: usize,
    pub height: usize,
    bands: Vec<Vec<f64>>,
    nodata: Option<f64>,
    cell_type: CellType,
}

impl GeoTiffHandle {
    /// No-data value declared in the file, if any.
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }
}

impl RasterHandle for GeoTiffHandle {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn band(&self, band: usize) -> StyleResult<BandData<'_>> {
        let idx = check_band(band, self.bands.len())?;
        Ok(BandData {
            values: &self.bands[idx],
            nodata: self.nodata,
            cell_type: self.cell_type,
        })
    }
}

impl RasterDecoder for GeoTiffDecoder {
    type Handle = GeoTiffHandle;

    fn open(&self, path: &Path) -> StyleResult<Self::Handle> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !VALID_EXTENSIONS.contains(&extension.as_str()) {
            return Err(StyleError::UnreadableRaster(format!(
                "{}: unsupported raster format (expected .tif, .tiff or .gtiff)",
                path.display()
            )));
        }

        let file = File::open(path).map_err(|e| unreadable(path, e))?;
        let mut decoder = Decoder::new(BufReader::new(file)).map_err(|e| unreadable(path, e))?;

        let (width, height) = decoder.dimensions().map_err(|e| unreadable(path, e))?;
        let samples_per_pixel = match decoder
            .find_tag(Tag::SamplesPerPixel)
            .map_err(|e| unreadable(path, e))?
        {
            Some(value) => value.into_u16().map_err(|e| unreadable(path, e))? as usize,
            None => 1,
        };
        let nodata = read_nodata(&mut decoder, path);

        let image = decoder.read_image().map_err(|e| unreadable(path, e))?;
        let (samples, cell_type) = decoding_result_to_f64(image).map_err(|e| unreadable(path, e))?;

        let width = width as usize;
        let height = height as usize;
        let bands = deinterleave(&samples, samples_per_pixel.max(1), width * height)
            .map_err(|e| unreadable(path, e))?;

        debug!(
            path = %path.display(),
            width,
            height,
            bands = bands.len(),
            nodata = ?nodata,
            cell_type = ?cell_type,
            "Decoded GeoTIFF"
        );

        Ok(GeoTiffHandle {
            width,
            height,
            bands,
            nodata,
            cell_type,
        })
    }
}

fn unreadable(path: &Path, err: impl Display) -> StyleError {
    StyleError::UnreadableRaster(format!("{}: {}", path.display(), err))
}

/// Read the GDAL no-data tag (42113), an ASCII-encoded number. An
/// unparseable tag is ignored with a warning.
fn read_nodata<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    path: &Path,
) -> Option<f64> {
    let value = decoder.find_tag(Tag::GdalNodata).ok()??;
    let text = value.into_string().ok()?;
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());

    match text.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) if text.eq_ignore_ascii_case("nan") => Some(f64::NAN),
        Err(_) => {
            warn!(path = %path.display(), tag = text, "Ignoring unparseable GDAL_NODATA tag");
            None
        }
    }
}

fn decoding_result_to_f64(image: DecodingResult) -> Result<(Vec<f64>, CellType), String> {
    #[allow(unreachable_patterns)]
    let decoded = match image {
        DecodingResult::U8(v) => (v.into_iter().map(f64::from).collect(), CellType::Integer),
        DecodingResult::U16(v) => (v.into_iter().map(f64::from).collect(), CellType::Integer),
        DecodingResult::U32(v) => (v.into_iter().map(f64::from).collect(), CellType::Integer),
        DecodingResult::U64(v) => (v.into_iter().map(|x| x as f64).collect(), CellType::Integer),
        DecodingResult::I8(v) => (v.into_iter().map(f64::from).collect(), CellType::Integer),
        DecodingResult::I16(v) => (v.into_iter().map(f64::from).collect(), CellType::Integer),
        DecodingResult::I32(v) => (v.into_iter().map(f64::from).collect(), CellType::Integer),
        DecodingResult::I64(v) => (v.into_iter().map(|x| x as f64).collect(), CellType::Integer),
        DecodingResult::F32(v) => (v.into_iter().map(f64::from).collect(), CellType::Float32),
        DecodingResult::F64(v) => (v, CellType::Float64),
        _ => return Err("unsupported sample format".to_string()),
    };
    Ok(decoded)
}

/// Split chunky `[b1, b2, b1, b2, ...]` samples into one vector per band.
fn deinterleave(samples: &[f64], band_count: usize, cells: usize) -> Result<Vec<Vec<f64>>, String> {
    if samples.len() != cells * band_count {
        return Err(format!(
            "expected {} samples ({} cells x {} bands), decoded {}",
            cells * band_count,
            cells,
            band_count,
            samples.len()
        ));
    }

    if band_count == 1 {
        return Ok(vec![samples.to_vec()]);
    }

    let mut bands = vec![Vec::with_capacity(cells); band_count];
    for pixel in samples.chunks_exact(band_count) {
        for (band, value) in bands.iter_mut().zip(pixel) {
            band.push(*value);
        }
    }
    Ok(bands)
}
