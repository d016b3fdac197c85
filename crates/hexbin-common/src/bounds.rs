//! Geographic bounding box of a raster.

use serde::{Deserialize, Serialize};

use crate::error::{HexbinError, HexbinResult};

/// An axis-aligned geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Extent in longitude degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Extent in latitude degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Planar area in square degrees (negative when the box is inverted).
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Ensure the box is usable as a tiling region.
    ///
    /// All coordinates must be finite, latitudes within [-90, 90], longitudes
    /// within [-180, 180], and the box must have positive area.
    pub fn validate(&self) -> HexbinResult<()> {
        let coords = [self.min_lat, self.min_lon, self.max_lat, self.max_lon];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(HexbinError::invalid_config(format!(
                "bounds contain non-finite coordinates: {:?}",
                self
            )));
        }

        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(HexbinError::invalid_config(format!(
                "latitude out of range [-90, 90]: {} .. {}",
                self.min_lat, self.max_lat
            )));
        }

        if self.min_lon < -180.0 || self.max_lon > 180.0 {
            return Err(HexbinError::invalid_config(format!(
                "longitude out of range [-180, 180]: {} .. {}",
                self.min_lon, self.max_lon
            )));
        }

        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(HexbinError::invalid_config(format!(
                "bounds have zero area: {:?}",
                self
            )));
        }

        Ok(())
    }

    /// The box as a closed ring of `(lat, lon)` points, first = last.
    ///
    /// Winding is counter-clockwise in (lon, lat) space.
    pub fn to_ring(&self) -> [(f64, f64); 5] {
        [
            (self.min_lat, self.min_lon),
            (self.min_lat, self.max_lon),
            (self.max_lat, self.max_lon),
            (self.max_lat, self.min_lon),
            (self.min_lat, self.min_lon),
        ]
    }
}

impl std::fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}, {:.6}]",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_is_closed() {
        let bounds = GeoBounds::new(0.0, 10.0, 1.0, 11.0);
        let ring = bounds.to_ring();
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[2], (1.0, 11.0));
    }

    #[test]
    fn test_validate() {
        assert!(GeoBounds::new(0.0, 0.0, 1.0, 1.0).validate().is_ok());

        // Zero area
        assert!(GeoBounds::new(0.0, 0.0, 0.0, 1.0).validate().is_err());
        // Inverted
        assert!(GeoBounds::new(1.0, 0.0, 0.0, 1.0).validate().is_err());
        // Out of range
        assert!(GeoBounds::new(-91.0, 0.0, 0.0, 1.0).validate().is_err());
        assert!(GeoBounds::new(0.0, 0.0, f64::NAN, 1.0).validate().is_err());
    }
}
