//! Tests for GeoBounds and the raster grid extent.

use hexbin_common::{Crs, GeoBounds, GeoTransform, HexbinError, InclusionRule, RasterGrid};

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_width_height_area() {
    let bounds = GeoBounds::new(10.0, 20.0, 12.0, 25.0);
    assert_eq!(bounds.width(), 5.0);
    assert_eq!(bounds.height(), 2.0);
    assert_eq!(bounds.area(), 10.0);
}

#[test]
fn test_ring_counter_clockwise() {
    let ring = GeoBounds::new(0.0, 0.0, 1.0, 2.0).to_ring();

    // Shoelace in (lon, lat): positive for counter-clockwise
    let twice_area: f64 = ring
        .windows(2)
        .map(|w| w[0].1 * w[1].0 - w[1].1 * w[0].0)
        .sum();
    assert!(twice_area > 0.0);
    assert!((twice_area / 2.0 - 2.0).abs() < 1e-12);
}

#[test]
fn test_inverted_box_is_configuration_error() {
    let err = GeoBounds::new(10.0, 5.0, 9.0, 6.0).validate().unwrap_err();
    assert!(matches!(err, HexbinError::InvalidConfiguration(_)));
    assert!(err.to_string().contains("zero area"));
}

#[test]
fn test_display() {
    let bounds = GeoBounds::new(52.45, 13.35, 52.55, 13.45);
    assert_eq!(
        bounds.to_string(),
        "[52.450000, 13.350000, 52.550000, 13.450000]"
    );
}

#[test]
fn test_serde_roundtrip_field_names() {
    let bounds = GeoBounds::new(1.0, 2.0, 3.0, 4.0);
    let json = serde_json::to_value(bounds).unwrap();
    assert_eq!(json["min_lat"], 1.0);
    assert_eq!(json["max_lon"], 4.0);
}

// ============================================================================
// Raster extent
// ============================================================================

#[test]
fn test_grid_bounds_validate() {
    let grid = RasterGrid::new(
        vec![1.0; 6],
        3,
        2,
        None,
        GeoTransform::north_up(-100.0, 42.0, 1.0, 1.0),
        Crs::wgs84(),
    )
    .unwrap();

    let bounds = grid.bounds();
    assert_eq!(bounds, GeoBounds::new(40.0, -100.0, 42.0, -97.0));
    assert!(bounds.validate().is_ok());
}

#[test]
fn test_rotated_grid_rejected() {
    let err = RasterGrid::new(
        vec![1.0; 4],
        2,
        2,
        None,
        GeoTransform([0.0, 1.0, 0.1, 0.0, 0.0, -1.0]),
        Crs::wgs84(),
    )
    .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_sample_count_mismatch_rejected() {
    let result = RasterGrid::new(
        vec![1.0; 5],
        3,
        2,
        None,
        GeoTransform::north_up(0.0, 0.0, 1.0, 1.0),
        Crs::Unknown,
    );
    assert!(result.is_err());
}

#[test]
fn test_inclusion_rule_default() {
    assert_eq!(InclusionRule::default(), InclusionRule::AllTouched);
}
