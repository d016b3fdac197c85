//! Pixel window under a geographic extent.

use geo::Rect;
use hexbin_common::RasterGrid;

/// Half-open range of pixel columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub col_start: usize,
    pub col_end: usize,
    pub row_start: usize,
    pub row_end: usize,
}

impl PixelWindow {
    /// Pixels whose closed footprint meets `rect` (x = lon, y = lat),
    /// clipped to the raster. `None` when no pixel does.
    ///
    /// A pixel that only shares an edge or corner with `rect` is included,
    /// matching the `Intersects` test used for all-touched selection.
    pub fn covering(rect: &Rect<f64>, grid: &RasterGrid) -> Option<Self> {
        let transform = grid.transform();
        let (c0, r0) = transform.invert(rect.min().x, rect.min().y);
        let (c1, r1) = transform.invert(rect.max().x, rect.max().y);

        let (cols, rows) = (grid.width() as f64, grid.height() as f64);
        let col_start = (c0.min(c1).ceil() - 1.0).clamp(0.0, cols);
        let col_end = (c0.max(c1).floor() + 1.0).clamp(0.0, cols);
        let row_start = (r0.min(r1).ceil() - 1.0).clamp(0.0, rows);
        let row_end = (r0.max(r1).floor() + 1.0).clamp(0.0, rows);

        if !(col_start < col_end && row_start < row_end) {
            return None;
        }

        Some(Self {
            col_start: col_start as usize,
            col_end: col_end as usize,
            row_start: row_start as usize,
            row_end: row_end as usize,
        })
    }

    pub fn width(&self) -> usize {
        self.col_end - self.col_start
    }

    pub fn height(&self) -> usize {
        self.row_end - self.row_start
    }

    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(col, row)` pairs in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row_start..self.row_end)
            .flat_map(move |row| (self.col_start..self.col_end).map(move |col| (col, row)))
    }
}
