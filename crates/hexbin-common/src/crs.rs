//! Coordinate reference system identifiers.
//!
//! The pipeline never reprojects; the CRS read from the raster is carried
//! through for logging and reporting only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// EPSG code of WGS84 geographic coordinates.
pub const EPSG_WGS84: u16 = 4326;

/// CRS of a raster as declared by its metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    /// Geographic CRS identified by EPSG code (lat/lon in degrees).
    Geographic(u16),
    /// Projected CRS identified by EPSG code.
    Projected(u16),
    /// No CRS information in the source.
    Unknown,
}

impl Crs {
    /// WGS84 lat/lon.
    pub fn wgs84() -> Self {
        Crs::Geographic(EPSG_WGS84)
    }

    /// EPSG code, if known.
    pub fn epsg(&self) -> Option<u16> {
        match self {
            Crs::Geographic(code) | Crs::Projected(code) => Some(*code),
            Crs::Unknown => None,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic(_))
    }
}

impl Default for Crs {
    fn default() -> Self {
        Crs::Unknown
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg() {
            Some(code) => write!(f, "EPSG:{}", code),
            None => write!(f, "unknown"),
        }
    }
}
