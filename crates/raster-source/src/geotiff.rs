//! GeoTIFF decoding.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::{debug, info};

use hexbin_common::{Crs, GeoTransform, HexbinError, HexbinResult, RasterGrid};

use crate::RasterSource;

// GeoTIFF tag ids; looked up with `Tag::from_u16_exhaustive` so the
// decoder's named variants match
const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;
const GEOTIFF_MODELTRANSFORMATION: u16 = 34264;
const GEOTIFF_GEOKEYDIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

// GeoKey IDs
const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

// GeoKey values
const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_POINT: u16 = 2;
const USER_DEFINED: u16 = 32767;

/// Reads band 1 of a GeoTIFF, without the decoder's memory limits.
#[derive(Debug, Clone, Default)]
pub struct GeoTiffSource;

impl GeoTiffSource {
    pub fn new() -> Self {
        Self
    }
}

impl RasterSource for GeoTiffSource {
    fn open(&self, path: &Path) -> HexbinResult<RasterGrid> {
        let file = File::open(path).map_err(|e| HexbinError::raster_open(path, e.to_string()))?;
        let grid = read_geotiff(BufReader::new(file))
            .map_err(|e| HexbinError::raster_open(path, e))?;

        info!(
            path = %path.display(),
            width = grid.width(),
            height = grid.height(),
            crs = %grid.crs(),
            nodata = ?grid.nodata(),
            bounds = %grid.bounds(),
            "Opened raster"
        );

        Ok(grid)
    }
}

/// Decode a GeoTIFF stream into a grid. Errors are returned as messages and
/// wrapped with the path by the caller.
fn read_geotiff<R: Read + Seek>(reader: R) -> Result<RasterGrid, String> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| e.to_string())?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions().map_err(|e| e.to_string())?;
    let (width, height) = (width as usize, height as usize);

    let geokeys = read_geokeys(&mut decoder)?;
    let transform = read_transform(&mut decoder, &geokeys)?;
    let crs = geokeys.crs();
    let raw_nodata = read_nodata(&mut decoder)?;

    debug!(width, height, ?transform, %crs, ?raw_nodata, "Decoded GeoTIFF header");

    let samples = decoder.read_image().map_err(|e| e.to_string())?;
    let (data, nodata) = widen_samples(samples, width * height, raw_nodata)?;

    RasterGrid::new(data, width, height, nodata, transform, crs).map_err(|e| e.to_string())
}

/// Parsed GeoKeyDirectory entries that are stored inline.
#[derive(Debug, Default)]
struct GeoKeys {
    model_type: Option<u16>,
    raster_type: Option<u16>,
    geographic_type: Option<u16>,
    projected_type: Option<u16>,
}

impl GeoKeys {
    fn parse(directory: &[u16]) -> Self {
        let mut keys = GeoKeys::default();
        if directory.len() < 4 {
            return keys;
        }

        // Header: [version, revision, minor, count], then 4 shorts per key:
        // [key id, tag location, count, value]
        let count = directory[3] as usize;
        for entry in directory[4..].chunks_exact(4).take(count) {
            let (id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 {
                // Value lives in GeoDoubleParams/GeoAsciiParams.
                continue;
            }
            match id {
                GT_MODEL_TYPE_GEO_KEY => keys.model_type = Some(value),
                GT_RASTER_TYPE_GEO_KEY => keys.raster_type = Some(value),
                GEOGRAPHIC_TYPE_GEO_KEY => keys.geographic_type = Some(value),
                PROJECTED_CS_TYPE_GEO_KEY => keys.projected_type = Some(value),
                _ => {}
            }
        }
        keys
    }

    fn crs(&self) -> Crs {
        let known = |code: Option<u16>| code.filter(|c| *c != 0 && *c != USER_DEFINED);

        match self.model_type {
            Some(MODEL_TYPE_PROJECTED) => known(self.projected_type)
                .map(Crs::Projected)
                .unwrap_or(Crs::Unknown),
            Some(MODEL_TYPE_GEOGRAPHIC) => known(self.geographic_type)
                .map(Crs::Geographic)
                .unwrap_or(Crs::Unknown),
            _ => {
                if let Some(code) = known(self.projected_type) {
                    Crs::Projected(code)
                } else if let Some(code) = known(self.geographic_type) {
                    Crs::Geographic(code)
                } else {
                    Crs::Unknown
                }
            }
        }
    }

    fn pixel_is_point(&self) -> bool {
        self.raster_type == Some(RASTER_PIXEL_IS_POINT)
    }
}

fn read_geokeys<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<GeoKeys, String> {
    let value = decoder
        .find_tag(Tag::from_u16_exhaustive(GEOTIFF_GEOKEYDIRECTORY))
        .map_err(|e| e.to_string())?;

    match value {
        Some(value) => {
            let directory: Vec<u16> = value
                .into_u32_vec()
                .map_err(|e| format!("invalid GeoKeyDirectory: {}", e))?
                .into_iter()
                .map(|v| v as u16)
                .collect();
            Ok(GeoKeys::parse(&directory))
        }
        None => Ok(GeoKeys::default()),
    }
}

fn read_f64_tag<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    tag: u16,
) -> Result<Option<Vec<f64>>, String> {
    match decoder.find_tag(Tag::from_u16_exhaustive(tag)).map_err(|e| e.to_string())? {
        Some(value) => value
            .into_f64_vec()
            .map(Some)
            .map_err(|e| format!("invalid tag {}: {}", tag, e)),
        None => Ok(None),
    }
}

fn read_transform<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    geokeys: &GeoKeys,
) -> Result<GeoTransform, String> {
    if let Some(m) = read_f64_tag(decoder, GEOTIFF_MODELTRANSFORMATION)? {
        if m.len() < 8 {
            return Err(format!(
                "ModelTransformation has {} values, expected 16",
                m.len()
            ));
        }
        return Ok(GeoTransform([m[3], m[0], m[1], m[7], m[4], m[5]]));
    }

    let scale = read_f64_tag(decoder, GEOTIFF_MODELPIXELSCALE)?
        .ok_or_else(|| "missing georeferencing (no ModelPixelScale tag)".to_string())?;
    let tiepoint = read_f64_tag(decoder, GEOTIFF_MODELTIEPOINT)?
        .ok_or_else(|| "missing georeferencing (no ModelTiepoint tag)".to_string())?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err("malformed ModelPixelScale/ModelTiepoint tags".to_string());
    }

    let (sx, sy) = (scale[0], scale[1]);
    let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);

    let mut origin_x = x - i * sx;
    let mut origin_y = y + j * sy;
    if geokeys.pixel_is_point() {
        // Tie point refers to the pixel centre.
        origin_x -= 0.5 * sx;
        origin_y += 0.5 * sy;
    }

    Ok(GeoTransform::north_up(origin_x, origin_y, sx, sy))
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<f64>, String> {
    let value = match decoder
        .find_tag(Tag::from_u16_exhaustive(GDAL_NODATA))
        .map_err(|e| e.to_string())?
    {
        Some(value) => value,
        None => return Ok(None),
    };

    let text = value
        .into_string()
        .map_err(|e| format!("invalid GDAL_NODATA tag: {}", e))?;
    parse_nodata(&text).map(Some)
}

/// Parse a GDAL_NODATA string ("-9999", "nan", "-3.4028234663852886e+38").
pub(crate) fn parse_nodata(text: &str) -> Result<f64, String> {
    let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    trimmed
        .parse::<f64>()
        .map_err(|_| format!("invalid GDAL_NODATA value '{}'", trimmed))
}

/// Keep only the first sample of each pixel and widen to f64.
fn first_band<T: Copy>(
    values: Vec<T>,
    pixels: usize,
    widen: impl Fn(T) -> f64,
) -> Result<Vec<f64>, String> {
    if pixels == 0 || values.len() < pixels || values.len() % pixels != 0 {
        return Err(format!(
            "sample count {} does not match {} pixels",
            values.len(),
            pixels
        ));
    }

    let stride = values.len() / pixels;
    Ok(values.into_iter().step_by(stride).map(widen).collect())
}

/// Widen samples to f64 and bring the nodata sentinel into the same
/// representation, so that `sample == nodata` is exact.
pub(crate) fn widen_samples(
    samples: DecodingResult,
    pixels: usize,
    nodata: Option<f64>,
) -> Result<(Vec<f64>, Option<f64>), String> {
    let (data, nodata) = match samples {
        DecodingResult::U8(v) => (first_band(v, pixels, f64::from)?, nodata),
        DecodingResult::U16(v) => (first_band(v, pixels, f64::from)?, nodata),
        DecodingResult::U32(v) => (first_band(v, pixels, f64::from)?, nodata),
        DecodingResult::U64(v) => (first_band(v, pixels, |x| x as f64)?, nodata),
        DecodingResult::I8(v) => (first_band(v, pixels, f64::from)?, nodata),
        DecodingResult::I16(v) => (first_band(v, pixels, f64::from)?, nodata),
        DecodingResult::I32(v) => (first_band(v, pixels, f64::from)?, nodata),
        DecodingResult::I64(v) => (first_band(v, pixels, |x| x as f64)?, nodata),
        DecodingResult::F32(v) => (
            first_band(v, pixels, f64::from)?,
            // The sentinel string may carry more precision than f32 holds.
            nodata.map(|nd| nd as f32 as f64),
        ),
        DecodingResult::F64(v) => (first_band(v, pixels, |x| x)?, nodata),
        #[allow(unreachable_patterns)]
        _ => return Err("unsupported sample format".to_string()),
    };

    Ok((data, nodata))
}
