//! Reading GeoTIFF fixtures written by test-utils.

use std::path::Path;

use hexbin_common::{Crs, HexbinError};
use raster_source::{GeoTiffSource, MemorySource, RasterSource};
use test_utils::fixtures::raster;
use test_utils::fixtures::RasterSpec;
use test_utils::{
    assert_approx_eq, constant_grid, temp_geotiff_f32, temp_geotiff_f32_with, temp_geotiff_i16,
    Georeference,
};

fn assert_extent(grid: &hexbin_common::RasterGrid, spec: &RasterSpec) {
    let bounds = grid.bounds();
    let (min_lat, min_lon, max_lat, max_lon) = spec.extent();
    assert_approx_eq!(bounds.min_lat, min_lat, 1e-9);
    assert_approx_eq!(bounds.min_lon, min_lon, 1e-9);
    assert_approx_eq!(bounds.max_lat, max_lat, 1e-9);
    assert_approx_eq!(bounds.max_lon, max_lon, 1e-9);
}

// ============================================================================
// Georeferencing
// ============================================================================

#[test]
fn test_open_f32_geotiff() {
    let spec = raster::SIMPLE_10X10;
    let values = vec![42.0f32; spec.width * spec.height];
    let file = temp_geotiff_f32(&spec, &values, Some(-9999.0));

    let grid = GeoTiffSource::new().open(file.path()).unwrap();

    assert_eq!(grid.width(), 10);
    assert_eq!(grid.height(), 10);
    assert_eq!(grid.crs(), Crs::Geographic(4326));
    assert_eq!(grid.nodata(), Some(-9999.0));
    assert_eq!(grid.valid_count(), 100);
    assert_extent(&grid, &spec);
}

#[test]
fn test_model_transformation() {
    let spec = raster::EQUATOR_40X30;
    let values: Vec<f32> = (0..spec.width * spec.height).map(|v| v as f32).collect();
    let file = temp_geotiff_f32_with(&spec, &values, None, Georeference::Transformation);

    let grid = GeoTiffSource::new().open(file.path()).unwrap();

    assert_eq!(grid.width(), 40);
    assert_eq!(grid.height(), 30);
    assert!(grid.transform().is_axis_aligned());
    assert_approx_eq!(grid.transform().pixel_width(), 0.005, 1e-12);
    assert_approx_eq!(grid.transform().pixel_height(), -0.005, 1e-12);
    assert_extent(&grid, &spec);
    assert_eq!(grid.get(1, 0), Some(1.0));
}

#[test]
fn test_pixel_is_point_shifts_half_pixel() {
    let spec = raster::COARSE_4X4;
    let values = vec![7.0f32; spec.width * spec.height];
    let file = temp_geotiff_f32_with(&spec, &values, None, Georeference::PixelIsPoint);

    let grid = GeoTiffSource::new().open(file.path()).unwrap();

    // The tie point sits on the centre of pixel (0, 0)
    let (lon, lat) = grid.pixel_center(0, 0);
    assert_approx_eq!(lon, spec.origin_lon + 0.5, 1e-12);
    assert_approx_eq!(lat, spec.origin_lat - 0.5, 1e-12);
    assert_extent(&grid, &spec);
}

#[test]
fn test_pixel_order_is_row_major_from_top_left() {
    let spec = raster::SIMPLE_10X10;
    let values: Vec<f32> = (0..100).map(|v| v as f32).collect();
    let file = temp_geotiff_f32(&spec, &values, None);

    let grid = GeoTiffSource::new().open(file.path()).unwrap();
    assert_eq!(grid.get(0, 0), Some(0.0));
    assert_eq!(grid.get(9, 0), Some(9.0));
    assert_eq!(grid.get(0, 1), Some(10.0));
    assert_eq!(grid.nodata(), None);
}

// ============================================================================
// Nodata handling
// ============================================================================

#[test]
fn test_i16_nodata_matches_exactly() {
    let spec = raster::SIMPLE_10X10;
    let mut values = vec![120i16; spec.width * spec.height];
    values[0] = -9999;
    values[55] = -9999;
    let file = temp_geotiff_i16(&spec, &values, Some(-9999.0));

    let grid = GeoTiffSource::new().open(file.path()).unwrap();
    assert!(grid.is_nodata(grid.get(0, 0).unwrap()));
    assert_eq!(grid.valid_count(), 98);
}

#[test]
fn test_nan_nodata() {
    let spec = raster::SIMPLE_10X10;
    let mut values = vec![1.0f32; spec.width * spec.height];
    values[3] = f32::NAN;
    let file = temp_geotiff_f32(&spec, &values, Some(f64::NAN));

    let grid = GeoTiffSource::new().open(file.path()).unwrap();
    assert!(grid.nodata().unwrap().is_nan());
    assert!(grid.is_nodata(grid.get(3, 0).unwrap()));
    assert_eq!(grid.valid_count(), 99);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_file_is_open_failure() {
    let err = GeoTiffSource::new()
        .open(Path::new("/nonexistent/dir/raster.tif"))
        .unwrap_err();
    assert!(matches!(err, HexbinError::RasterOpenFailure { .. }));
    assert!(err.to_string().contains("/nonexistent/dir/raster.tif"));
}

#[test]
fn test_non_tiff_is_open_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not-a-raster.tif");
    std::fs::write(&path, b"this is not a tiff").unwrap();

    let err = GeoTiffSource::new().open(&path).unwrap_err();
    assert!(matches!(err, HexbinError::RasterOpenFailure { .. }));
}

// ============================================================================
// Memory source
// ============================================================================

#[test]
fn test_memory_source_ignores_path() {
    let grid = constant_grid(&raster::SIMPLE_10X10, 5.0, None);
    let source = MemorySource::new(grid);
    let opened = source.open(Path::new("anything.tif")).unwrap();
    assert_eq!(opened.get(4, 4), Some(5.0));
}
