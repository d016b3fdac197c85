//! Per-hexagon result.

use hex_tiler::{HexCell, HexPolygon};

/// A hexagon boundary paired with its mean, `None` when no valid pixel fell
/// inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct HexRecord {
    polygon: HexPolygon,
    mean: Option<f64>,
}

impl HexRecord {
    pub fn new(polygon: HexPolygon, mean: Option<f64>) -> Self {
        Self { polygon, mean }
    }

    pub fn cell(&self) -> HexCell {
        self.polygon.cell()
    }

    pub fn polygon(&self) -> &HexPolygon {
        &self.polygon
    }

    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    pub fn is_absent(&self) -> bool {
        self.mean.is_none()
    }
}
