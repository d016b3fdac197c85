//! Hexagonal tiling of a raster extent.
//!
//! Covers a bounding box with H3 cells at a fixed resolution and converts
//! each cell to the closed polygon used as a zonal statistics query shape.

pub mod cell;
pub mod polygon;
pub mod tiler;

pub use cell::{parse_resolution, HexCell, MAX_RESOLUTION};
pub use polygon::{to_polygon, HexPolygon};
pub use tiler::tile;
