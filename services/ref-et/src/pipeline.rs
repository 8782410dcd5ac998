//! End-to-end reference evapotranspiration pipeline.
//!
//! Stages run one after another on the calling task:
//!
//! 1. read the reference raster and vectorize its valid-data footprint
//! 2. fetch and average the year's temperatures over the buffered footprint
//! 3. estimate Thornthwaite PET for the hottest month
//! 4. optionally resample the PET grid onto the reference grid
//! 5. write a single-band float32 GeoTIFF

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use grid_processor::{
    extract_extent, read_geotiff, GeoTiffWriteResult, GeoTiffWriter, GridAligner,
    GridProcessorError,
};
use ingestion::{ClimateDataSource, TemperatureAggregator, DEFAULT_BUFFER_DIST};
use thornthwaite::PetEstimator;
use tracing::{info, instrument};

/// Latitude of the Jonction site (46.2012°N) in radians.
pub const JONCTION_LAT: f64 = 0.8063630583724042;

/// Knobs exposed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Resample the PET grid onto the reference raster's grid.
    pub align: bool,
    /// Buffer around the reference footprint, in meters.
    pub buffer_dist: f64,
    /// Site latitude in radians.
    pub latitude: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            align: true,
            buffer_dist: DEFAULT_BUFFER_DIST,
            latitude: JONCTION_LAT,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub written: GeoTiffWriteResult,
    pub hottest_month: Option<NaiveDate>,
    pub daylight_factor: f64,
    pub aligned: bool,
}

/// Reference raster + year in, PET GeoTIFF out.
pub struct RefEtPipeline<S> {
    aggregator: TemperatureAggregator<S>,
    estimator: PetEstimator,
    aligner: GridAligner,
    writer: GeoTiffWriter,
    options: PipelineOptions,
}

impl<S: ClimateDataSource> RefEtPipeline<S> {
    pub fn new(source: S, aligner: GridAligner, options: PipelineOptions) -> Self {
        Self {
            aggregator: TemperatureAggregator::new(source),
            estimator: PetEstimator::new(),
            aligner,
            writer: GeoTiffWriter::new(),
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        self.aggregator.source()
    }

    /// Run every stage for `year` and write the result to `dst`.
    ///
    /// Nothing is fetched when the reference raster has no valid pixel, and
    /// `dst` is left untouched by any failure.
    #[instrument(skip_all, fields(reference = %ref_path.display(), year = year, dst = %dst.display()))]
    pub async fn run(&self, ref_path: &Path, year: i32, dst: &Path) -> Result<PipelineReport> {
        let reference = read_geotiff(ref_path)
            .with_context(|| format!("failed to read reference raster {}", ref_path.display()))?;

        let extent = extract_extent(&reference).context("failed to extract raster extent")?;
        info!(
            bounds = ?extent.bounds(),
            vertices = extent.vertex_count(),
            "Extracted reference extent"
        );

        let crs = reference
            .crs
            .ok_or_else(|| GridProcessorError::misaligned("reference raster has no supported CRS"))?;

        let monthly = self
            .aggregator
            .aggregate(&extent, year, crs, self.options.buffer_dist)
            .await
            .with_context(|| format!("failed to aggregate temperatures for {}", year))?;

        let pet = self.estimator.estimate(&monthly, self.options.latitude);
        info!(
            hottest_month = ?pet.hottest_month,
            daylight_factor = pet.daylight_factor,
            "Estimated PET"
        );
        let hottest_month = pet.hottest_month;
        let daylight_factor = pet.daylight_factor;

        let grid = if self.options.align {
            // Opened again so alignment does not depend on extent extraction.
            let target = read_geotiff(ref_path)
                .with_context(|| format!("failed to reopen reference raster {}", ref_path.display()))?
                .band(0)
                .ok_or_else(|| GridProcessorError::read_failed("reference raster has no band"))?;
            self.aligner
                .align(&pet.grid, &target)
                .context("failed to align PET grid onto reference raster")?
        } else {
            pet.into_grid()
        };
        info!(aligned = self.options.align, "PET grid ready");

        let written = self
            .writer
            .write(&grid, dst)
            .with_context(|| format!("failed to write {}", dst.display()))?;
        info!(path = %dst.display(), "Dumped reference evapotranspiration raster");

        Ok(PipelineReport {
            written,
            hottest_month,
            daylight_factor,
            aligned: self.options.align,
        })
    }
}

/// Check that the reference raster path exists.
pub fn existing_file(s: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("'{}' does not exist or is not a file", s))
    }
}

/// Parse a buffer distance in meters: finite and non-negative.
pub fn buffer_distance(s: &str) -> std::result::Result<f64, String> {
    let dist: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !dist.is_finite() || dist < 0.0 {
        return Err(format!("buffer distance must be finite and >= 0, got {}", s));
    }
    Ok(dist)
}
