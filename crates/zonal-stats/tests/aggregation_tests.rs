//! Aggregation over real H3 hexagons.

use hex_tiler::{tile, to_polygon, HexCell};
use hexbin_common::InclusionRule;
use test_utils::fixtures::{nodata, raster};
use test_utils::{assert_approx_eq, constant_grid, gradient_grid, half_nodata_grid, nodata_grid};
use zonal_stats::{mean_in_polygon, zonal_stats};

/// Resolution-6 hexagon centred on the 10x10 fixture (edge ~3 km, pixels ~1 km).
fn center_hexagon() -> hex_tiler::HexPolygon {
    to_polygon(HexCell::containing(52.5, 13.4, 6).unwrap())
}

// ============================================================================
// Constant rasters
// ============================================================================

#[test]
fn test_constant_raster_mean() {
    let grid = constant_grid(&raster::SIMPLE_10X10, 5.0, Some(nodata::ELEVATION));
    let polygon = center_hexagon();

    for rule in [InclusionRule::AllTouched, InclusionRule::CenterIn] {
        assert_eq!(mean_in_polygon(&polygon, &grid, rule), Some(5.0));
    }
}

#[test]
fn test_small_hexagon_all_touched() {
    // Resolution-10 hexagons are far smaller than a pixel
    let grid = constant_grid(&raster::SIMPLE_10X10, 5.0, None);
    let polygon = to_polygon(HexCell::containing(52.5012, 13.4031, 10).unwrap());

    let stats = zonal_stats(&polygon, &grid, InclusionRule::AllTouched);
    assert!(stats.count >= 1);
    assert_eq!(stats.mean(), Some(5.0));
}

#[test]
fn test_all_nodata_is_absent() {
    let grid = nodata_grid(&raster::SIMPLE_10X10, nodata::ELEVATION);
    let polygon = center_hexagon();

    let stats = zonal_stats(&polygon, &grid, InclusionRule::AllTouched);
    assert!(stats.is_empty());
    assert!(stats.nodata_count > 0);
    assert_eq!(mean_in_polygon(&polygon, &grid, InclusionRule::AllTouched), None);
}

#[test]
fn test_nan_sentinel_is_absent() {
    let grid = nodata_grid(&raster::SIMPLE_10X10, f64::NAN);
    let polygon = center_hexagon();
    assert_eq!(mean_in_polygon(&polygon, &grid, InclusionRule::CenterIn), None);
}

#[test]
fn test_hexagon_outside_raster_is_absent() {
    let grid = constant_grid(&raster::SIMPLE_10X10, 5.0, None);
    let polygon = to_polygon(HexCell::containing(-33.9, 18.4, 6).unwrap());

    let stats = zonal_stats(&polygon, &grid, InclusionRule::AllTouched);
    assert_eq!(stats.count, 0);
    assert_eq!(stats.nodata_count, 0);
}

// ============================================================================
// Mixed rasters
// ============================================================================

#[test]
fn test_partial_nodata_ignores_sentinel() {
    let grid = half_nodata_grid(&raster::SIMPLE_10X10, 7.0, nodata::ELEVATION);
    let polygon = center_hexagon();

    let stats = zonal_stats(&polygon, &grid, InclusionRule::AllTouched);
    assert!(stats.count > 0);
    assert!(stats.nodata_count > 0);
    assert_eq!(stats.mean(), Some(7.0));
}

#[test]
fn test_mean_within_range() {
    let grid = gradient_grid(&raster::SIMPLE_10X10, None);
    let polygon = center_hexagon();

    let stats = zonal_stats(&polygon, &grid, InclusionRule::AllTouched);
    let (min, max) = stats.range().unwrap();
    let mean = stats.mean().unwrap();
    assert!(min <= mean && mean <= max);
    assert_approx_eq!(stats.sum / stats.count as f64, mean, 1e-9);
}

#[test]
fn test_center_in_never_selects_more_than_all_touched() {
    let spec = raster::EQUATOR_40X30;
    let grid = gradient_grid(&spec, None);
    let (min_lat, min_lon, max_lat, max_lon) = spec.extent();
    let bounds = hexbin_common::GeoBounds::new(min_lat, min_lon, max_lat, max_lon);

    let mut differs = false;
    for cell in tile(&bounds, 8).unwrap() {
        let polygon = to_polygon(cell);
        let center = zonal_stats(&polygon, &grid, InclusionRule::CenterIn);
        let touched = zonal_stats(&polygon, &grid, InclusionRule::AllTouched);
        assert!(center.count <= touched.count, "cell {}", cell);
        differs |= center.count != touched.count;
    }
    assert!(differs);
}
