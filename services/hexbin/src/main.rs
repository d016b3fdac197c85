//! Hexbin command line tool.
//!
//! Reads a single-band GeoTIFF, averages it over H3 hexagons and writes the
//! hexagons with data as a GeoJSON FeatureCollection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use hexbin_common::{HexbinError, InclusionRule};
use hexbin_pipeline::{
    output_path_for, refilter, run_with_sink, BarSink, HexbinConfig, LogSink, NullSink, RunReport,
};

#[derive(Parser, Debug)]
#[command(name = "hexbin")]
#[command(about = "Summarize a raster as mean values over H3 hexagons")]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info", env = "HEXBIN_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate a raster into hexagons
    Run(RunArgs),

    /// Remove features without a mean value from an existing GeoJSON file
    Refilter {
        /// GeoJSON file to rewrite in place
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// YAML configuration file (flags and HEXBIN_* variables take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input GeoTIFF
    #[arg(short, long)]
    raster: Option<PathBuf>,

    /// Output GeoJSON (default: <raster stem>-<resolution>.geojson)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// H3 resolution (0-15)
    #[arg(long)]
    resolution: Option<u8>,

    /// Hexagons per chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Worker pool size
    #[arg(short, long)]
    workers: Option<usize>,

    /// Pixel inclusion rule: all-touched or center-in
    #[arg(long)]
    inclusion: Option<String>,

    /// Progress display
    #[arg(long, value_enum, default_value_t = ProgressMode::Bars)]
    progress: ProgressMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ProgressMode {
    Bars,
    Log,
    None,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    match cli.command {
        Command::Run(args) => run(args),
        Command::Refilter { path } => {
            let report = refilter(&path)
                .with_context(|| format!("failed to refilter {}", path.display()))?;
            info!(
                path = %path.display(),
                kept = report.kept,
                removed = report.removed,
                "Refilter complete"
            );
            Ok(())
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;
    info!(
        raster = %config.raster_path.display(),
        output = %config.output_path.display(),
        resolution = config.resolution,
        chunk_size = config.chunk_size,
        workers = config.worker_count,
        inclusion = %config.inclusion_rule,
        "Starting hexbin run"
    );

    let result = match args.progress {
        ProgressMode::Bars => run_with_sink(&config, BarSink::new()),
        ProgressMode::Log => run_with_sink(&config, LogSink::default()),
        ProgressMode::None => run_with_sink(&config, NullSink),
    };

    match result {
        Ok(report) => {
            log_report(&report);
            Ok(())
        }
        Err(HexbinError::ChunksFailed(failures)) => {
            for failure in &failures {
                error!(
                    chunk = failure.chunk,
                    cell = %failure.cell,
                    error = %failure.message,
                    "Chunk failed"
                );
            }
            anyhow::bail!("{} chunk(s) failed; no output written", failures.len())
        }
        Err(e) => Err(e.into()),
    }
}

/// Defaults, then the YAML file, then `HEXBIN_*` variables, then flags.
fn build_config(args: &RunArgs) -> Result<HexbinConfig> {
    let base = match &args.config {
        Some(path) => HexbinConfig::from_yaml(path)?,
        None => HexbinConfig::default(),
    };
    let mut config = base.with_overrides(|key| std::env::var(key).ok());
    let output_was_set = args.output.is_some()
        || args.config.is_some()
        || std::env::var("HEXBIN_OUTPUT").is_ok();

    if let Some(raster) = &args.raster {
        config.raster_path = raster.clone();
    }
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(workers) = args.workers {
        config.worker_count = workers;
    }
    if let Some(inclusion) = &args.inclusion {
        config.inclusion_rule = inclusion.parse::<InclusionRule>()?;
    }

    match &args.output {
        Some(output) => config.output_path = output.clone(),
        None if !output_was_set => {
            config.output_path = output_path_for(&config.raster_path, config.resolution)
        }
        None => {}
    }

    config.validate().map_err(HexbinError::InvalidConfiguration)?;
    Ok(config)
}

fn log_report(report: &RunReport) {
    let secs = report.elapsed.as_secs_f64();
    info!(
        hexagons_generated = report.total_hexagons,
        hexagons_with_values = report.kept,
        null_hexagons_removed = report.removed,
        chunks = report.chunks,
        resolution = report.resolution,
        bounds = %report.bounds,
        crs = %report.crs,
        output = %report.output_path.display(),
        elapsed_secs = secs,
        elapsed_mins = secs / 60.0,
        "Hexbin complete"
    );
}
