//! Common test fixtures for hexbin tests.
//!
//! Raster shapes are small enough to tile at H3 resolutions 6-8 in
//! milliseconds while still producing several hexagons.

/// A raster layout: size in pixels plus the top-left corner and pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSpec {
    pub width: usize,
    pub height: usize,
    /// Longitude of the west edge.
    pub origin_lon: f64,
    /// Latitude of the north edge.
    pub origin_lat: f64,
    /// Pixel size in degrees (square pixels).
    pub pixel_size: f64,
}

impl RasterSpec {
    /// (min_lat, min_lon, max_lat, max_lon) of the raster extent.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (
            self.origin_lat - self.height as f64 * self.pixel_size,
            self.origin_lon,
            self.origin_lat,
            self.origin_lon + self.width as f64 * self.pixel_size,
        )
    }
}

/// Common raster layouts for testing.
pub mod raster {
    use super::RasterSpec;

    /// 10x10 raster, 0.01 degree pixels, around (52.5N, 13.4E).
    ///
    /// Roughly 11 km across; yields dozens of resolution 7 hexagons.
    pub const SIMPLE_10X10: RasterSpec = RasterSpec {
        width: 10,
        height: 10,
        origin_lon: 13.35,
        origin_lat: 52.55,
        pixel_size: 0.01,
    };

    /// 40x30 raster, 0.005 degree pixels, straddling the equator and meridian.
    pub const EQUATOR_40X30: RasterSpec = RasterSpec {
        width: 40,
        height: 30,
        origin_lon: -0.1,
        origin_lat: 0.075,
        pixel_size: 0.005,
    };

    /// 4x4 raster of 1 degree pixels (coarse; a few resolution 3 cells).
    pub const COARSE_4X4: RasterSpec = RasterSpec {
        width: 4,
        height: 4,
        origin_lon: -100.0,
        origin_lat: 42.0,
        pixel_size: 1.0,
    };
}

/// Common nodata sentinels.
pub mod nodata {
    /// The classic elevation-model sentinel.
    pub const ELEVATION: f64 = -9999.0;

    /// Lowest finite f32, as written by GDAL for float rasters.
    pub const F32_MIN: f64 = f32::MIN as f64;
}

/// H3 resolutions that give a handful of hexagons for the fixtures above.
pub mod resolution {
    /// Use with `raster::SIMPLE_10X10` and `raster::EQUATOR_40X30`.
    pub const FINE: u8 = 7;

    /// Use with `raster::COARSE_4X4`.
    pub const COARSE: u8 = 3;
}
