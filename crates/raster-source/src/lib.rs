//! Raster Source Adapter.
//!
//! Opens a single-band GeoTIFF and exposes it as an immutable
//! [`RasterGrid`]: samples widened to `f64`, nodata sentinel, affine
//! transform, CRS and bounds. The file handle only lives for the duration
//! of [`RasterSource::open`].
//!
//! # Example
//!
//! ```ignore
//! use raster_source::{GeoTiffSource, RasterSource};
//!
//! let grid = GeoTiffSource::new().open(Path::new("dem.tif"))?;
//! println!("{}x{} {}", grid.width(), grid.height(), grid.crs());
//! ```

pub mod geotiff;
pub mod memory;

use std::path::Path;

use hexbin_common::{HexbinResult, RasterGrid};

pub use geotiff::GeoTiffSource;
pub use memory::MemorySource;

/// Something that can produce a [`RasterGrid`] from a path.
pub trait RasterSource: Send + Sync {
    /// Open the raster at `path` and read band 1 fully into memory.
    fn open(&self, path: &Path) -> HexbinResult<RasterGrid>;
}
