//! Cell boundary polygons.

use geo::{Coord, LineString, Polygon};
use hexbin_common::GeoBounds;

use crate::cell::HexCell;

/// Closed boundary ring of one cell.
///
/// Vertices are `(lat, lon)` in degrees, counter-clockwise, with the first
/// vertex repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct HexPolygon {
    cell: HexCell,
    ring: Vec<(f64, f64)>,
}

impl HexPolygon {
    pub fn cell(&self) -> HexCell {
        self.cell
    }

    /// Closed ring of `(lat, lon)` vertices.
    pub fn ring(&self) -> &[(f64, f64)] {
        &self.ring
    }

    /// Number of distinct vertices (6 for hexagons, 5 for pentagons, more
    /// where a boundary crosses an icosahedron edge).
    pub fn vertex_count(&self) -> usize {
        self.ring.len().saturating_sub(1)
    }

    /// Planar polygon with x = lon, y = lat.
    pub fn to_geo(&self) -> Polygon<f64> {
        let exterior: LineString<f64> = self
            .ring
            .iter()
            .map(|&(lat, lon)| Coord { x: lon, y: lat })
            .collect();
        Polygon::new(exterior, vec![])
    }

    /// Extent of the ring.
    pub fn bounds(&self) -> GeoBounds {
        let mut bounds = GeoBounds::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for &(lat, lon) in &self.ring {
            bounds.min_lat = bounds.min_lat.min(lat);
            bounds.min_lon = bounds.min_lon.min(lon);
            bounds.max_lat = bounds.max_lat.max(lat);
            bounds.max_lon = bounds.max_lon.max(lon);
        }
        bounds
    }
}

/// Trace the boundary of a cell as a closed polygon.
pub fn to_polygon(cell: HexCell) -> HexPolygon {
    let boundary = cell.index().boundary();
    let mut ring: Vec<(f64, f64)> = boundary.iter().map(|ll| (ll.lat(), ll.lng())).collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    HexPolygon { cell, ring }
}
