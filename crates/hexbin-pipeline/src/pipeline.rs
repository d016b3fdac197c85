//! End-to-end run: raster in, GeoJSON out.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use hex_tiler::tile;
use hexbin_common::{Crs, GeoBounds, HexbinError, HexbinResult};
use raster_source::{GeoTiffSource, RasterSource};
use tracing::{info, warn};

use crate::config::HexbinConfig;
use crate::filter::filter_absent;
use crate::output::{write_feature_collection, FeatureCollection};
use crate::partition::partition;
use crate::pool::run_chunks;
use crate::progress::{LogSink, ProgressReporter, ProgressSink};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Hexagons produced by tiling.
    pub total_hexagons: usize,
    /// Hexagons written to the output.
    pub kept: usize,
    /// Hexagons dropped for lack of valid pixels.
    pub removed: usize,
    pub chunks: usize,
    pub resolution: u8,
    pub bounds: GeoBounds,
    pub crs: Crs,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// Run with the GeoTIFF reader and log-based progress.
pub fn run(config: &HexbinConfig) -> HexbinResult<RunReport> {
    run_with_sink(config, LogSink::default())
}

/// Run with the GeoTIFF reader and a caller-supplied progress sink.
pub fn run_with_sink<S>(config: &HexbinConfig, sink: S) -> HexbinResult<RunReport>
where
    S: ProgressSink + 'static,
{
    run_with(config, &GeoTiffSource::new(), sink)
}

/// Run against any raster source.
pub fn run_with<S>(
    config: &HexbinConfig,
    source: &dyn RasterSource,
    sink: S,
) -> HexbinResult<RunReport>
where
    S: ProgressSink + 'static,
{
    let started = Instant::now();
    config.validate().map_err(HexbinError::InvalidConfiguration)?;

    let grid = source.open(&config.raster_path)?;
    let bounds = grid.bounds();
    let crs = grid.crs();
    if !crs.is_geographic() {
        warn!(crs = %crs, "Raster CRS is not geographic; coordinates are treated as degrees");
    }

    let cells = tile(&bounds, config.resolution)?;
    info!(
        hexagons = cells.len(),
        resolution = config.resolution,
        bounds = %bounds,
        "Generated hexagons"
    );

    let chunks = partition(&cells, config.chunk_size)?;

    let reporter = ProgressReporter::spawn(sink)?;
    let records = run_chunks(&chunks, &grid, config, &reporter.handle());
    reporter.finish();
    let records = records?;

    let outcome = filter_absent(records);
    let collection = FeatureCollection::from_records(&outcome.kept);
    write_feature_collection(&config.output_path, &collection)?;

    let elapsed = started.elapsed();
    info!(
        output = %config.output_path.display(),
        hexagons_with_values = outcome.kept.len(),
        null_hexagons_removed = outcome.removed,
        elapsed_secs = elapsed.as_secs_f64(),
        elapsed_mins = elapsed.as_secs_f64() / 60.0,
        "Hexbin run complete"
    );

    Ok(RunReport {
        total_hexagons: cells.len(),
        kept: outcome.kept.len(),
        removed: outcome.removed,
        chunks: chunks.len(),
        resolution: config.resolution,
        bounds,
        crs,
        output_path: config.output_path.clone(),
        elapsed,
    })
}
