//! Aggregation of one chunk.

use hex_tiler::{to_polygon, HexCell};
use hexbin_common::{HexbinError, HexbinResult, InclusionRule, RasterGrid};
use zonal_stats::zonal_stats;

use crate::partition::Chunk;
use crate::progress::{ProgressEvent, ProgressHandle};
use crate::record::HexRecord;

/// Aggregate every hexagon of a chunk, in chunk order.
///
/// Absent means are ordinary results. The chunk fails on the first hexagon
/// with a degenerate boundary or a non-finite mean.
pub fn process_chunk(
    chunk: &Chunk<HexCell>,
    grid: &RasterGrid,
    rule: InclusionRule,
    progress: &ProgressHandle,
) -> HexbinResult<Vec<HexRecord>> {
    let chunk_len = chunk.len();
    let mut records = Vec::with_capacity(chunk_len);

    for (position, &cell) in chunk.items().iter().enumerate() {
        let polygon = to_polygon(cell);
        if polygon.vertex_count() < 3 {
            return Err(HexbinError::chunk_failed(
                chunk.index(),
                cell.to_string(),
                format!("degenerate boundary with {} vertices", polygon.vertex_count()),
            ));
        }

        let mean = zonal_stats(&polygon, grid, rule).mean();
        if let Some(value) = mean.filter(|v| !v.is_finite()) {
            return Err(HexbinError::chunk_failed(
                chunk.index(),
                cell.to_string(),
                format!("non-finite mean {}", value),
            ));
        }

        records.push(HexRecord::new(polygon, mean));
        progress.send(ProgressEvent::HexagonDone {
            chunk: chunk.index(),
            position,
            chunk_len,
        });
    }

    Ok(records)
}
