//! Fixed-size worker pool over chunks.

use std::time::Instant;

use hex_tiler::HexCell;
use hexbin_common::{ChunkFailure, HexbinError, HexbinResult, RasterGrid};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{error, info};

use crate::config::HexbinConfig;
use crate::merge::merge;
use crate::partition::Chunk;
use crate::progress::{ProgressEvent, ProgressHandle};
use crate::record::HexRecord;
use crate::worker::process_chunk;

/// Run every chunk on a pool of `config.worker_count` threads and merge the
/// results in chunk order.
///
/// All chunks run to completion even when some fail; failures are reported
/// together as [`HexbinError::ChunksFailed`].
pub fn run_chunks(
    chunks: &[Chunk<HexCell>],
    grid: &RasterGrid,
    config: &HexbinConfig,
    progress: &ProgressHandle,
) -> HexbinResult<Vec<HexRecord>> {
    if config.worker_count == 0 {
        return Err(HexbinError::invalid_config("worker_count must be > 0"));
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.worker_count)
        .thread_name(|i| format!("hexbin-worker-{}", i))
        .build()
        .map_err(|e| HexbinError::Internal(format!("failed to build worker pool: {}", e)))?;

    let total_chunks = chunks.len();
    let rule = config.inclusion_rule;

    info!(
        chunks = total_chunks,
        workers = config.worker_count,
        inclusion = %rule,
        "Processing chunks"
    );

    let outcomes: Vec<(usize, HexbinResult<Vec<HexRecord>>)> = pool.install(|| {
        chunks
            .par_iter()
            .map_with(progress.clone(), |progress, chunk| {
                let started = Instant::now();
                progress.send(ProgressEvent::ChunkStarted {
                    chunk: chunk.index(),
                    total_chunks,
                    len: chunk.len(),
                });

                let result = process_chunk(chunk, grid, rule, progress);

                progress.send(ProgressEvent::ChunkDone {
                    chunk: chunk.index(),
                    total_chunks,
                    elapsed: started.elapsed(),
                });
                (chunk.index(), result)
            })
            .collect()
    });

    let mut outputs = Vec::with_capacity(outcomes.len());
    let mut failures: Vec<ChunkFailure> = Vec::new();
    for (index, result) in outcomes {
        match result {
            Ok(records) => outputs.push((index, records)),
            Err(e) => {
                let mut chunk_failures = e.chunk_failures();
                if chunk_failures.is_empty() {
                    chunk_failures.push(ChunkFailure {
                        chunk: index,
                        cell: "-".to_string(),
                        message: e.to_string(),
                    });
                }
                for failure in &chunk_failures {
                    error!(
                        chunk = failure.chunk,
                        cell = %failure.cell,
                        error = %failure.message,
                        "Chunk failed"
                    );
                }
                failures.extend(chunk_failures);
            }
        }
    }

    if !failures.is_empty() {
        failures.sort_by_key(|f| f.chunk);
        return Err(HexbinError::ChunksFailed(failures));
    }

    Ok(merge(outputs))
}
