//! Raster grid held in memory for zonal aggregation.

use serde::{Deserialize, Serialize};

use crate::bounds::GeoBounds;
use crate::crs::Crs;
use crate::error::{HexbinError, HexbinResult};

/// Affine transform from pixel (col, row) to geographic (x = lon, y = lat).
///
/// Coefficients use GDAL ordering:
/// `x = c[0] + col * c[1] + row * c[2]`, `y = c[3] + col * c[4] + row * c[5]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    /// North-up transform from the top-left corner and pixel size.
    ///
    /// `pixel_height` is the positive size; rows run north to south.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self([origin_x, pixel_width, 0.0, origin_y, 0.0, -pixel_height])
    }

    pub fn origin_x(&self) -> f64 {
        self.0[0]
    }

    pub fn origin_y(&self) -> f64 {
        self.0[3]
    }

    pub fn pixel_width(&self) -> f64 {
        self.0[1]
    }

    /// Signed pixel height (negative for north-up rasters).
    pub fn pixel_height(&self) -> f64 {
        self.0[5]
    }

    /// True when there are no rotation/shear terms.
    pub fn is_axis_aligned(&self) -> bool {
        self.0[2] == 0.0 && self.0[4] == 0.0
    }

    /// Geographic coordinate of a fractional pixel position.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let c = &self.0;
        (c[0] + col * c[1] + row * c[2], c[3] + col * c[4] + row * c[5])
    }

    /// Fractional pixel position of a geographic coordinate.
    ///
    /// Only valid for axis-aligned transforms.
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x()) / self.pixel_width(),
            (y - self.origin_y()) / self.pixel_height(),
        )
    }
}

/// Immutable single-band raster: samples, nodata sentinel, georeferencing.
///
/// Samples are stored row-major starting at the top-left pixel and widened
/// to `f64`. The nodata sentinel is stored in the same representation so it
/// compares exactly against the samples.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    data: Vec<f64>,
    width: usize,
    height: usize,
    nodata: Option<f64>,
    transform: GeoTransform,
    crs: Crs,
}

impl RasterGrid {
    /// Create a new grid, checking that the sample count matches the shape.
    pub fn new(
        data: Vec<f64>,
        width: usize,
        height: usize,
        nodata: Option<f64>,
        transform: GeoTransform,
        crs: Crs,
    ) -> HexbinResult<Self> {
        if width == 0 || height == 0 {
            return Err(HexbinError::invalid_config(format!(
                "raster has invalid dimensions: {}x{}",
                width, height
            )));
        }

        if data.len() != width * height {
            return Err(HexbinError::invalid_config(format!(
                "raster has {} samples, expected {}x{} = {}",
                data.len(),
                width,
                height,
                width * height
            )));
        }

        if !transform.is_axis_aligned() {
            return Err(HexbinError::invalid_config(
                "rotated or sheared rasters are not supported",
            ));
        }

        if transform.pixel_width() == 0.0 || transform.pixel_height() == 0.0 {
            return Err(HexbinError::invalid_config("raster pixel size is zero"));
        }

        Ok(Self {
            data,
            width,
            height,
            nodata,
            transform,
            crs,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// All samples in row-major order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sample at a pixel position.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Check whether a sample is the nodata sentinel.
    ///
    /// A NaN sentinel matches NaN samples.
    pub fn is_nodata(&self, value: f64) -> bool {
        match self.nodata {
            Some(nd) if nd.is_nan() => value.is_nan(),
            Some(nd) => value == nd,
            None => false,
        }
    }

    /// Geographic extent of the full raster.
    pub fn bounds(&self) -> GeoBounds {
        let (x0, y0) = self.transform.apply(0.0, 0.0);
        let (x1, y1) = self
            .transform
            .apply(self.width as f64, self.height as f64);

        GeoBounds {
            min_lat: y0.min(y1),
            min_lon: x0.min(x1),
            max_lat: y0.max(y1),
            max_lon: x0.max(x1),
        }
    }

    /// Geographic centre of a pixel as `(lon, lat)`.
    pub fn pixel_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Number of valid (non-nodata, non-NaN) samples.
    pub fn valid_count(&self) -> usize {
        self.data
            .iter()
            .filter(|v| !v.is_nan() && !self.is_nodata(**v))
            .count()
    }
}
