//! Pixel inclusion rule for zonal statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HexbinError;

/// Which raster pixels count towards a polygon's statistics.
///
/// Fixed for a whole run; the two rules give materially different means on
/// small or boundary hexagons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InclusionRule {
    /// Every pixel whose footprint intersects the polygon counts fully.
    AllTouched,
    /// Only pixels whose centre lies inside the polygon count.
    CenterIn,
}

impl Default for InclusionRule {
    fn default() -> Self {
        Self::AllTouched
    }
}

impl InclusionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllTouched => "all-touched",
            Self::CenterIn => "center-in",
        }
    }
}

impl FromStr for InclusionRule {
    type Err = HexbinError;

    /// Parse from string (case-insensitive, `-` or `_` separators).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "all-touched" | "all" => Ok(Self::AllTouched),
            "center-in" | "centre-in" | "center" => Ok(Self::CenterIn),
            _ => Err(HexbinError::invalid_config(format!(
                "unknown inclusion rule '{}', expected 'all-touched' or 'center-in'",
                s
            ))),
        }
    }
}

impl fmt::Display for InclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
