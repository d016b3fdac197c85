//! Running summary of the pixels selected for one polygon.

use serde::{Deserialize, Serialize};

/// Summary of selected pixels.
///
/// `count` only includes valid samples; nodata and NaN samples inside the
/// polygon are tallied in `nodata_count` and never reach `sum`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZonalStats {
    pub count: usize,
    pub nodata_count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ZonalStats {
    fn default() -> Self {
        Self {
            count: 0,
            nodata_count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl ZonalStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn push_nodata(&mut self) {
        self.nodata_count += 1;
    }

    /// True when no valid sample was selected.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Arithmetic mean of the valid samples, or `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// Minimum and maximum of the valid samples.
    pub fn range(&self) -> Option<(f64, f64)> {
        (self.count > 0).then_some((self.min, self.max))
    }
}
