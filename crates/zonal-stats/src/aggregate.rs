//! Pixel selection and aggregation for one polygon.

use geo::{coord, BoundingRect, Contains, Intersects, Point, Polygon, Rect};
use hex_tiler::HexPolygon;
use hexbin_common::{InclusionRule, RasterGrid};
use tracing::trace;

use crate::stats::ZonalStats;
use crate::window::PixelWindow;

/// Mean of the valid pixels selected by `rule`, or `None` when the polygon
/// selects no valid pixel (including polygons outside the raster).
pub fn mean_in_polygon(
    polygon: &HexPolygon,
    grid: &RasterGrid,
    rule: InclusionRule,
) -> Option<f64> {
    zonal_stats(polygon, grid, rule).mean()
}

/// Full pixel summary for a hexagon.
pub fn zonal_stats(polygon: &HexPolygon, grid: &RasterGrid, rule: InclusionRule) -> ZonalStats {
    let stats = zonal_stats_geometry(&polygon.to_geo(), grid, rule);
    trace!(
        cell = %polygon.cell(),
        count = stats.count,
        nodata = stats.nodata_count,
        "Aggregated hexagon"
    );
    stats
}

/// Pixel summary for an arbitrary polygon in raster coordinates
/// (x = lon, y = lat).
pub fn zonal_stats_geometry(
    polygon: &Polygon<f64>,
    grid: &RasterGrid,
    rule: InclusionRule,
) -> ZonalStats {
    let mut stats = ZonalStats::default();

    let Some(extent) = polygon.bounding_rect() else {
        return stats;
    };
    let Some(window) = PixelWindow::covering(&extent, grid) else {
        return stats;
    };

    for (col, row) in window.pixels() {
        if !selects(polygon, grid, col, row, rule) {
            continue;
        }

        let Some(value) = grid.get(col, row) else {
            continue;
        };

        if value.is_nan() || grid.is_nodata(value) {
            stats.push_nodata();
        } else {
            stats.push(value);
        }
    }

    stats
}

fn selects(
    polygon: &Polygon<f64>,
    grid: &RasterGrid,
    col: usize,
    row: usize,
    rule: InclusionRule,
) -> bool {
    match rule {
        InclusionRule::CenterIn => {
            let (lon, lat) = grid.pixel_center(col, row);
            polygon.contains(&Point::new(lon, lat))
        }
        InclusionRule::AllTouched => polygon.intersects(&pixel_footprint(grid, col, row)),
    }
}

fn pixel_footprint(grid: &RasterGrid, col: usize, row: usize) -> Rect<f64> {
    let transform = grid.transform();
    let (x0, y0) = transform.apply(col as f64, row as f64);
    let (x1, y1) = transform.apply(col as f64 + 1.0, row as f64 + 1.0);
    Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 })
}
