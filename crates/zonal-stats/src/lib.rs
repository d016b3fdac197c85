//! Zonal statistics: raster samples summarized over a hexagon.
//!
//! Pixels are selected by an [`InclusionRule`](hexbin_common::InclusionRule),
//! nodata samples are dropped before any arithmetic, and a polygon with no
//! valid pixels yields an absent mean rather than an error.

pub mod aggregate;
pub mod stats;
pub mod window;

pub use aggregate::{mean_in_polygon, zonal_stats, zonal_stats_geometry};
pub use stats::ZonalStats;
pub use window::PixelWindow;
