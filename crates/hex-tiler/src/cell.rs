//! H3 cell identifiers.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use h3o::{CellIndex, LatLng, Resolution};
use hexbin_common::{HexbinError, HexbinResult};

/// Finest H3 resolution.
pub const MAX_RESOLUTION: u8 = 15;

/// Validate a resolution level (0..=15).
pub fn parse_resolution(resolution: u8) -> HexbinResult<Resolution> {
    Resolution::try_from(resolution).map_err(|_| {
        HexbinError::invalid_config(format!(
            "resolution {} out of range 0..={}",
            resolution, MAX_RESOLUTION
        ))
    })
}

/// One hexagonal (or pentagonal) cell of the global H3 grid.
///
/// Ordered by its 64-bit index so tiling output is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexCell(CellIndex);

impl HexCell {
    /// Cell containing a geographic point.
    pub fn containing(lat: f64, lon: f64, resolution: u8) -> HexbinResult<Self> {
        let resolution = parse_resolution(resolution)?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(HexbinError::invalid_config(format!(
                "coordinate out of range: ({}, {})",
                lat, lon
            )));
        }
        let point = LatLng::new(lat, lon).map_err(|e| {
            HexbinError::invalid_config(format!("invalid coordinate ({}, {}): {}", lat, lon, e))
        })?;
        Ok(Self(point.to_cell(resolution)))
    }

    /// Parse the canonical hex string form (e.g. `8828308281fffff`).
    pub fn parse(s: &str) -> HexbinResult<Self> {
        s.parse()
    }

    pub fn index(&self) -> CellIndex {
        self.0
    }

    pub fn as_u64(&self) -> u64 {
        u64::from(self.0)
    }

    pub fn resolution(&self) -> u8 {
        u8::from(self.0.resolution())
    }

    /// Cell centroid as `(lat, lon)` in degrees.
    pub fn center(&self) -> (f64, f64) {
        let center = LatLng::from(self.0);
        (center.lat(), center.lng())
    }
}

impl From<CellIndex> for HexCell {
    fn from(index: CellIndex) -> Self {
        Self(index)
    }
}

impl TryFrom<u64> for HexCell {
    type Error = HexbinError;

    fn try_from(value: u64) -> HexbinResult<Self> {
        CellIndex::try_from(value).map(Self).map_err(|e| {
            HexbinError::invalid_config(format!("invalid cell index {:x}: {}", value, e))
        })
    }
}

impl FromStr for HexCell {
    type Err = HexbinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<CellIndex>()
            .map(Self)
            .map_err(|e| HexbinError::invalid_config(format!("invalid cell '{}': {}", s, e)))
    }
}

impl fmt::Display for HexCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Ord for HexCell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_u64().cmp(&other.as_u64())
    }
}

impl PartialOrd for HexCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
