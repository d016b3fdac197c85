//! Fixtures for hexbin tests: raster layouts, in-memory grids and GeoTIFF
//! files written to temporary directories.
//!
//! ```ignore
//! use test_utils::fixtures::{nodata, raster};
//! use test_utils::{constant_grid, temp_geotiff_f32};
//!
//! let grid = constant_grid(&raster::SIMPLE_10X10, 5.0, Some(nodata::ELEVATION));
//! ```

pub mod fixtures;
pub mod generators;
pub mod geotiff;

pub use fixtures::*;
pub use generators::*;
pub use geotiff::*;

/// Assert two numbers differ by at most `tolerance`.
///
/// All three arguments are compared as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected, tolerance) =
            ($actual as f64, $expected as f64, $tolerance as f64);
        assert!(
            (actual - expected).abs() <= tolerance,
            "assertion failed: {} is not within {} of {}",
            actual,
            tolerance,
            expected
        );
    }};
}
