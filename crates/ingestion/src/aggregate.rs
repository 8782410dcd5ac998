//! Monthly temperature aggregation over a buffered footprint.

use et_common::{CrsCode, MonthlyTemperatureSeries};
use grid_processor::ExtentGeometry;
use projection::CrsTransform;
use tracing::{debug, info, instrument};

use crate::error::{IngestionError, Result};
use crate::resample::{filter_year, monthly_mean};
use crate::source::ClimateDataSource;

/// Default buffer around the footprint, in meters.
pub const DEFAULT_BUFFER_DIST: f64 = 2000.0;

/// Retrieves a year of temperature samples and averages them per month.
pub struct TemperatureAggregator<S> {
    source: S,
}

impl<S: ClimateDataSource> TemperatureAggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Monthly means over the bounding box of `geometry` buffered by
    /// `buffer_dist` meters.
    ///
    /// `crs` is the CRS of `geometry`. The query box is transformed into the
    /// product's CRS and every intersecting cell is kept without masking.
    /// The result stays in the product's CRS. Fewer than twelve months are
    /// accepted as they come.
    #[instrument(skip(self, geometry), fields(crs = %crs))]
    pub async fn aggregate(
        &self,
        geometry: &ExtentGeometry,
        year: i32,
        crs: CrsCode,
        buffer_dist: f64,
    ) -> Result<MonthlyTemperatureSeries> {
        if !buffer_dist.is_finite() || buffer_dist < 0.0 {
            return Err(IngestionError::InvalidConfig(format!(
                "buffer distance must be a non-negative number of meters, got {}",
                buffer_dist
            )));
        }

        let query = geometry.buffered_bounds(buffer_dist);
        let samples = self.source.fetch_year(year).await?;

        let product_query = CrsTransform::new(crs, samples.crs).transform_bounds(&query)?;
        debug!(
            query = ?query,
            product_query = ?product_query,
            product_crs = %samples.crs,
            "Cropping climate grid"
        );

        let cropped = samples.crop_to_bounds(&product_query).ok_or_else(|| {
            IngestionError::RemoteData(format!(
                "climate grid {:?} does not cover the requested region {:?}",
                samples.bounds(),
                product_query
            ))
        })?;
        let in_year = filter_year(&cropped, year).ok_or_else(|| {
            IngestionError::RemoteData(format!("no climate samples for year {}", year))
        })?;

        let monthly = monthly_mean(&in_year);
        info!(
            months = monthly.len(),
            width = monthly.width(),
            height = monthly.height(),
            "Aggregated monthly temperatures"
        );
        Ok(monthly)
    }
}
