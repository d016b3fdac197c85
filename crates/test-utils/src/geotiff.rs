//! Minimal GeoTIFF writer for test fixtures.
//!
//! Writes a single-band, north-up, EPSG:4326 GeoTIFF with the tags the raster
//! source reads: ModelPixelScale + ModelTiepoint (or ModelTransformation),
//! GeoKeyDirectory and GDAL_NODATA.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tiff::encoder::colortype::{ColorType, Gray32Float, GrayI16};
use tiff::encoder::{TiffEncoder, TiffValue};
use tiff::tags::Tag;
use tiff::TiffResult;

use crate::fixtures::RasterSpec;

// GeoTIFF Tag IDs (not in standard tiff crate)
const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;
const GEOTIFF_MODELTRANSFORMATION: u16 = 34264;
const GEOTIFF_GEOKEYDIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

// GeoKey IDs
const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;

// GeoKey values
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const RASTER_PIXEL_IS_POINT: u16 = 2;
const EPSG_WGS84: u16 = 4326;

/// How a fixture places its pixels on the map.
///
/// All three layouts describe the same extent, `RasterSpec::extent()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Georeference {
    /// ModelPixelScale + ModelTiepoint at the top-left pixel corner.
    #[default]
    TiePoint,
    /// ModelPixelScale + ModelTiepoint at the top-left pixel centre,
    /// with GTRasterTypeGeoKey = PixelIsPoint.
    PixelIsPoint,
    /// A 4x4 ModelTransformation matrix instead of scale and tie point.
    Transformation,
}

/// A GeoTIFF written into a temporary directory that is removed on drop.
pub struct TempRaster {
    _dir: TempDir,
    path: PathBuf,
}

impl TempRaster {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the raster; also a convenient place for outputs.
    pub fn dir(&self) -> &Path {
        self._dir.path()
    }
}

/// Write a float32 GeoTIFF.
pub fn write_geotiff_f32<P: AsRef<Path>>(
    path: P,
    spec: &RasterSpec,
    values: &[f32],
    nodata: Option<f64>,
) -> TiffResult<()> {
    write_geotiff::<Gray32Float, _>(path, spec, values, nodata, Georeference::TiePoint)
}

/// Write a signed 16-bit integer GeoTIFF (typical of elevation models).
pub fn write_geotiff_i16<P: AsRef<Path>>(
    path: P,
    spec: &RasterSpec,
    values: &[i16],
    nodata: Option<f64>,
) -> TiffResult<()> {
    write_geotiff::<GrayI16, _>(path, spec, values, nodata, Georeference::TiePoint)
}

/// Write a float32 GeoTIFF named `input.tif` into a fresh temporary directory.
///
/// # Panics
///
/// Panics if the temporary directory or file cannot be created.
pub fn temp_geotiff_f32(spec: &RasterSpec, values: &[f32], nodata: Option<f64>) -> TempRaster {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("input.tif");
    write_geotiff_f32(&path, spec, values, nodata).expect("failed to write test GeoTIFF");
    TempRaster { _dir: dir, path }
}

/// Like [`temp_geotiff_f32`] with an explicit georeferencing layout.
///
/// # Panics
///
/// Panics if the temporary directory or file cannot be created.
pub fn temp_geotiff_f32_with(
    spec: &RasterSpec,
    values: &[f32],
    nodata: Option<f64>,
    georeference: Georeference,
) -> TempRaster {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("input.tif");
    write_geotiff::<Gray32Float, _>(&path, spec, values, nodata, georeference)
        .expect("failed to write test GeoTIFF");
    TempRaster { _dir: dir, path }
}

/// Write an int16 GeoTIFF named `input.tif` into a fresh temporary directory.
///
/// # Panics
///
/// Panics if the temporary directory or file cannot be created.
pub fn temp_geotiff_i16(spec: &RasterSpec, values: &[i16], nodata: Option<f64>) -> TempRaster {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("input.tif");
    write_geotiff_i16(&path, spec, values, nodata).expect("failed to write test GeoTIFF");
    TempRaster { _dir: dir, path }
}

fn write_geotiff<C, P>(
    path: P,
    spec: &RasterSpec,
    values: &[C::Inner],
    nodata: Option<f64>,
    georeference: Georeference,
) -> TiffResult<()>
where
    C: ColorType,
    [C::Inner]: TiffValue,
    P: AsRef<Path>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_geotiff_to::<C, _>(&mut writer, spec, values, nodata, georeference)?;
    writer.flush()?;
    Ok(())
}

fn write_geotiff_to<C, W>(
    writer: W,
    spec: &RasterSpec,
    values: &[C::Inner],
    nodata: Option<f64>,
    georeference: Georeference,
) -> TiffResult<()>
where
    C: ColorType,
    [C::Inner]: TiffValue,
    W: Write + Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;
    let mut image = encoder.new_image::<C>(spec.width as u32, spec.height as u32)?;
    let px = spec.pixel_size;

    {
        let dir = image.encoder();

        match georeference {
            Georeference::TiePoint | Georeference::PixelIsPoint => {
                // ModelPixelScale: [ScaleX, ScaleY, ScaleZ]
                let pixel_scale = [px, px, 0.0];
                dir.write_tag(tag(GEOTIFF_MODELPIXELSCALE), pixel_scale.as_slice())?;

                // ModelTiepoint: pixel (0, 0) -> corner, or its centre for PixelIsPoint
                let (x, y) = if georeference == Georeference::PixelIsPoint {
                    (spec.origin_lon + 0.5 * px, spec.origin_lat - 0.5 * px)
                } else {
                    (spec.origin_lon, spec.origin_lat)
                };
                let tiepoint = [0.0, 0.0, 0.0, x, y, 0.0];
                dir.write_tag(tag(GEOTIFF_MODELTIEPOINT), tiepoint.as_slice())?;
            }
            Georeference::Transformation => {
                #[rustfmt::skip]
                let matrix = [
                    px, 0.0, 0.0, spec.origin_lon,
                    0.0, -px, 0.0, spec.origin_lat,
                    0.0, 0.0, 0.0, 0.0,
                    0.0, 0.0, 0.0, 1.0,
                ];
                dir.write_tag(tag(GEOTIFF_MODELTRANSFORMATION), matrix.as_slice())?;
            }
        }

        let raster_type = if georeference == Georeference::PixelIsPoint {
            RASTER_PIXEL_IS_POINT
        } else {
            RASTER_PIXEL_IS_AREA
        };
        let geokeys: [u16; 16] = [
            1, 1, 0, 3, // version, revision, minor, key count
            GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_GEOGRAPHIC,
            GT_RASTER_TYPE_GEO_KEY, 0, 1, raster_type,
            GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, EPSG_WGS84,
        ];
        dir.write_tag(tag(GEOTIFF_GEOKEYDIRECTORY), geokeys.as_slice())?;

        if let Some(nd) = nodata {
            dir.write_tag(tag(GDAL_NODATA), nd.to_string().as_str())?;
        }
    }

    image.write_data(values)?;
    Ok(())
}

/// tiff names the GeoTIFF tags; build them from the numeric id.
fn tag(id: u16) -> Tag {
    Tag::from_u16_exhaustive(id)
}
