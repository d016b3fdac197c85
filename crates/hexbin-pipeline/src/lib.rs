//! Raster to hexagon aggregation pipeline.
//!
//! Tiles a raster's extent with H3 cells, splits the cells into fixed-size
//! chunks, aggregates the chunks on a bounded worker pool and writes the
//! hexagons that have data as a GeoJSON FeatureCollection.
//!
//! ```text
//! raster -> bounds -> tile -> partition -> process_chunk (xN) -> merge -> filter -> write
//! ```

pub mod config;
pub mod filter;
pub mod merge;
pub mod output;
pub mod partition;
pub mod pipeline;
pub mod pool;
pub mod progress;
pub mod record;
pub mod worker;

pub use config::{output_path_for, HexbinConfig};
pub use filter::{filter_absent, FilterOutcome};
pub use merge::merge;
pub use output::{
    read_feature_collection, refilter, write_feature_collection, Feature, FeatureCollection,
    RefilterReport,
};
pub use partition::{partition, Chunk};
pub use pipeline::{run, run_with, run_with_sink, RunReport};
pub use pool::run_chunks;
pub use progress::{
    BarSink, LogSink, NullSink, ProgressCounts, ProgressEvent, ProgressHandle, ProgressReporter,
    ProgressSink, RecordingSink,
};
pub use record::HexRecord;
pub use worker::process_chunk;
