//! Bounding box coverage.

use geo::{Coord, LineString, Polygon};
use h3o::geom::{ContainmentMode, TilerBuilder};
use hexbin_common::{GeoBounds, HexbinError, HexbinResult};
use tracing::debug;

use crate::cell::{parse_resolution, HexCell};

/// Widest strip, in longitude degrees, handed to the H3 tiler at once.
///
/// Edges spanning more than 180 degrees are read as crossing the
/// antimeridian, so wide boxes are split into narrower strips.
const MAX_STRIP_WIDTH: f64 = 90.0;

/// Every cell whose area intersects `bounds`, edge cells included.
///
/// Cells are returned once each, sorted by their 64-bit index.
pub fn tile(bounds: &GeoBounds, resolution: u8) -> HexbinResult<Vec<HexCell>> {
    let res = parse_resolution(resolution)?;
    bounds.validate()?;

    let mut tiler = TilerBuilder::new(res)
        .containment_mode(ContainmentMode::Covers)
        .build();

    for strip in strips(bounds) {
        tiler.add(strip_polygon(&strip)).map_err(|e| {
            HexbinError::invalid_config(format!("cannot tile bounds {}: {}", strip, e))
        })?;
    }

    let mut cells: Vec<HexCell> = tiler.into_coverage().map(HexCell::from).collect();
    cells.sort_unstable();
    cells.dedup();

    debug!(
        resolution = resolution,
        bounds = %bounds,
        cells = cells.len(),
        "Tiled bounding box"
    );

    Ok(cells)
}

fn strips(bounds: &GeoBounds) -> Vec<GeoBounds> {
    let count = (bounds.width() / MAX_STRIP_WIDTH).ceil().max(1.0) as usize;
    let step = bounds.width() / count as f64;

    (0..count)
        .map(|i| {
            let min_lon = bounds.min_lon + step * i as f64;
            let max_lon = if i + 1 == count {
                bounds.max_lon
            } else {
                min_lon + step
            };
            GeoBounds::new(bounds.min_lat, min_lon, bounds.max_lat, max_lon)
        })
        .collect()
}

fn strip_polygon(bounds: &GeoBounds) -> Polygon<f64> {
    let exterior: LineString<f64> = bounds
        .to_ring()
        .iter()
        .map(|&(lat, lon)| Coord { x: lon, y: lat })
        .collect();
    Polygon::new(exterior, vec![])
}
