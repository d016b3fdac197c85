//! Removal of hexagons without data.

use tracing::info;

use crate::record::HexRecord;

/// Result of a filter pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub kept: Vec<HexRecord>,
    pub removed: usize,
}

/// Drop every record with an absent mean in a single pass.
///
/// Filtering an already filtered collection removes nothing.
pub fn filter_absent(records: Vec<HexRecord>) -> FilterOutcome {
    let total = records.len();
    let kept: Vec<HexRecord> = records.into_iter().filter(|r| !r.is_absent()).collect();
    let removed = total - kept.len();

    info!(kept = kept.len(), removed, "Removed hexagons without data");

    FilterOutcome { kept, removed }
}
