//! Test data generators for creating synthetic rasters.
//!
//! These generators create predictable, verifiable raster patterns that can
//! be used across the test suite.

use hexbin_common::{Crs, GeoTransform, RasterGrid};

use crate::fixtures::RasterSpec;

/// Creates sample values with a predictable pattern.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_values;
///
/// let values = create_test_values(10, 5);
/// assert_eq!(values.len(), 50);
/// assert_eq!(values[0], 0.0);    // col=0, row=0
/// assert_eq!(values[1], 1000.0); // col=1, row=0
/// assert_eq!(values[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_values(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// The north-up transform for a raster layout.
pub fn transform_for(spec: &RasterSpec) -> GeoTransform {
    GeoTransform::north_up(
        spec.origin_lon,
        spec.origin_lat,
        spec.pixel_size,
        spec.pixel_size,
    )
}

/// Builds a WGS84 grid from a layout and row-major samples.
///
/// # Panics
///
/// Panics if `data.len()` does not match the layout.
pub fn grid_from_values(spec: &RasterSpec, data: Vec<f64>, nodata: Option<f64>) -> RasterGrid {
    RasterGrid::new(
        data,
        spec.width,
        spec.height,
        nodata,
        transform_for(spec),
        Crs::wgs84(),
    )
    .expect("test raster layout must be valid")
}

/// A grid where every sample equals `value`.
pub fn constant_grid(spec: &RasterSpec, value: f64, nodata: Option<f64>) -> RasterGrid {
    grid_from_values(spec, vec![value; spec.width * spec.height], nodata)
}

/// A grid where every sample is the nodata sentinel.
pub fn nodata_grid(spec: &RasterSpec, nodata: f64) -> RasterGrid {
    constant_grid(spec, nodata, Some(nodata))
}

/// A grid following `create_test_values`.
pub fn gradient_grid(spec: &RasterSpec, nodata: Option<f64>) -> RasterGrid {
    grid_from_values(spec, create_test_values(spec.width, spec.height), nodata)
}

/// A grid whose west half is `value` and east half is the nodata sentinel.
pub fn half_nodata_grid(spec: &RasterSpec, value: f64, nodata: f64) -> RasterGrid {
    let mut data = Vec::with_capacity(spec.width * spec.height);
    for _row in 0..spec.height {
        for col in 0..spec.width {
            data.push(if col < spec.width / 2 { value } else { nodata });
        }
    }
    grid_from_values(spec, data, Some(nodata))
}
