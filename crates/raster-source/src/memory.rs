//! In-memory raster source.

use std::path::Path;

use hexbin_common::{HexbinResult, RasterGrid};

use crate::RasterSource;

/// Serves an already-built grid regardless of the path asked for.
///
/// Used when the raster was produced in-process (tests, synthetic inputs).
#[derive(Debug, Clone)]
pub struct MemorySource {
    grid: RasterGrid,
}

impl MemorySource {
    pub fn new(grid: RasterGrid) -> Self {
        Self { grid }
    }
}

impl RasterSource for MemorySource {
    fn open(&self, _path: &Path) -> HexbinResult<RasterGrid> {
        Ok(self.grid.clone())
    }
}
