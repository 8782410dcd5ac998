//! Climate data sources.

use std::sync::Arc;

use async_trait::async_trait;
use et_common::TimeSeriesGrid;
use storage::ObjectStorage;
use tracing::{info, instrument};

use crate::config::ClimateSourceConfig;
use crate::error::{IngestionError, Result};
use crate::netcdf::series_from_netcdf;

/// A provider of daily (or sub-monthly) temperature grids, one year at a time.
#[async_trait]
pub trait ClimateDataSource: Send + Sync {
    /// Every sample of `year`, in the product's native CRS.
    async fn fetch_year(&self, year: i32) -> Result<TimeSeriesGrid>;
}

#[async_trait]
impl<T: ClimateDataSource + ?Sized> ClimateDataSource for Arc<T> {
    async fn fetch_year(&self, year: i32) -> Result<TimeSeriesGrid> {
        (**self).fetch_year(year).await
    }
}

/// MeteoSwiss gridded product stored as yearly NetCDF objects in S3.
pub struct S3ClimateSource {
    storage: Arc<ObjectStorage>,
    config: ClimateSourceConfig,
}

impl S3ClimateSource {
    pub fn new(storage: Arc<ObjectStorage>, config: ClimateSourceConfig) -> Self {
        Self { storage, config }
    }

    /// Connect to the object store described by `config`.
    pub fn connect(config: ClimateSourceConfig) -> Result<Self> {
        let storage = ObjectStorage::new(&config.storage)
            .map_err(|e| IngestionError::InvalidConfig(e.to_string()))?;
        Ok(Self::new(Arc::new(storage), config))
    }

    pub fn config(&self) -> &ClimateSourceConfig {
        &self.config
    }
}

#[async_trait]
impl ClimateDataSource for S3ClimateSource {
    #[instrument(skip(self), fields(variable = %self.config.variable))]
    async fn fetch_year(&self, year: i32) -> Result<TimeSeriesGrid> {
        let key = self.config.object_key(year);
        let data = self.storage.get(&key).await?;
        info!(
            bucket = %self.storage.bucket(),
            key = %key,
            size = data.len(),
            "Fetched climate data"
        );

        series_from_netcdf(&data, &self.config.variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_missing_object_is_remote_data_error() {
        let source = S3ClimateSource::new(
            Arc::new(ObjectStorage::in_memory("meteoswiss")),
            ClimateSourceConfig::default(),
        );
        let err = source.fetch_year(2019).await.unwrap_err();
        assert!(matches!(err, IngestionError::RemoteData(_)));
    }

    #[tokio::test]
    async fn test_corrupt_object_is_parse_error() {
        let storage = Arc::new(ObjectStorage::in_memory("meteoswiss"));
        let config = ClimateSourceConfig::default();
        storage
            .put(&config.object_key(2019), Bytes::from_static(b"garbage"))
            .await
            .unwrap();

        let source = S3ClimateSource::new(storage, config);
        let err = source.fetch_year(2019).await.unwrap_err();
        assert!(matches!(err, IngestionError::NetcdfParse(_)));
    }

    #[tokio::test]
    async fn test_fetch_decodes_stored_product() {
        let dir = test_utils::fixture_dir();
        let path = dir.path().join("TabsD_2019.nc");
        test_utils::write_tabsd_netcdf(&path, true);

        let storage = Arc::new(ObjectStorage::in_memory("meteoswiss"));
        let config = ClimateSourceConfig::default();
        storage
            .put(&config.object_key(2019), Bytes::from(std::fs::read(&path).unwrap()))
            .await
            .unwrap();

        let series = S3ClimateSource::new(storage, config)
            .fetch_year(2019)
            .await
            .unwrap();
        assert_eq!(series.crs, et_common::CrsCode::Epsg2056);
        assert_eq!(series.data.dim(), (2, 3, 2));
        assert_eq!(series.transform.origin_x, 2_499_000.0);
        assert_eq!(series.transform.origin_y, 1_120_000.0);
        assert!(series.data[[0, 2, 0]].is_nan());
        test_utils::assert_approx_eq!(series.data[[1, 0, 1]], 21.0, 1e-4);
    }
}
