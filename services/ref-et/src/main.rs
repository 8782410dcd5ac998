//! make-ref-et: Thornthwaite reference evapotranspiration raster.
//!
//! Reads a reference raster, fetches the year's MeteoSwiss daily temperature
//! grid from object storage and writes the PET of the hottest month as a
//! float32 GeoTIFF.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use et_common::parse_year;
use grid_processor::{GridAligner, GridProcessorConfig};
use ingestion::{ClimateSourceConfig, S3ClimateSource, DEFAULT_BUFFER_DIST};
use ref_et::{buffer_distance, existing_file, PipelineOptions, RefEtPipeline, JONCTION_LAT};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "make-ref-et")]
#[command(about = "Reference evapotranspiration raster for the Jonction site")]
struct Args {
    /// Reference raster (GeoTIFF) defining the extent and target grid
    #[arg(value_name = "REF_RASTER_FILEPATH", value_parser = existing_file)]
    ref_raster_filepath: PathBuf,

    /// Calendar year, e.g. 2019
    #[arg(value_name = "YEAR", value_parser = parse_year)]
    year: i32,

    /// Output GeoTIFF, overwritten if present
    #[arg(value_name = "DST_FILEPATH")]
    dst_filepath: PathBuf,

    /// Resample onto the reference raster grid (default)
    #[arg(long, overrides_with = "no_align")]
    align: bool,

    /// Keep the climate product's native grid
    #[arg(long, overrides_with = "align")]
    no_align: bool,

    /// Buffer around the reference footprint, in meters
    #[arg(long, default_value_t = DEFAULT_BUFFER_DIST, value_parser = buffer_distance)]
    buffer_dist: f64,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        reference = %args.ref_raster_filepath.display(),
        year = args.year,
        dst = %args.dst_filepath.display(),
        "Starting make-ref-et"
    );

    let source_config = ClimateSourceConfig::from_env();
    info!(
        endpoint = %source_config.storage.endpoint,
        bucket = %source_config.storage.bucket,
        variable = %source_config.variable,
        "Climate source configuration"
    );
    let source = S3ClimateSource::connect(source_config)
        .context("failed to connect to the climate data store")?;
    let aligner = GridAligner::from_config(&GridProcessorConfig::from_env());

    let options = PipelineOptions {
        align: args.align || !args.no_align,
        buffer_dist: args.buffer_dist,
        latitude: JONCTION_LAT,
    };
    let pipeline = RefEtPipeline::new(source, aligner, options);

    let report = pipeline
        .run(&args.ref_raster_filepath, args.year, &args.dst_filepath)
        .await?;

    info!(
        path = %report.written.path.display(),
        width = report.written.width,
        height = report.written.height,
        bytes = report.written.bytes_written,
        "Done"
    );
    Ok(())
}
