//! Common types and utilities shared across the hexbin crates.

pub mod bounds;
pub mod crs;
pub mod error;
pub mod grid;
pub mod inclusion;

pub use bounds::GeoBounds;
pub use crs::Crs;
pub use error::{ChunkFailure, HexbinError, HexbinResult};
pub use grid::{GeoTransform, RasterGrid};
pub use inclusion::InclusionRule;
