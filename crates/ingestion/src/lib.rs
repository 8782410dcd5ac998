//! Climate data retrieval and monthly aggregation.
//!
//! Fetches one year of the MeteoSwiss gridded daily temperature product,
//! crops it to the buffered footprint of the reference raster and averages it
//! over calendar months.
//!
//! # Architecture
//!
//! ```text
//! ExtentGeometry ──► buffered bounds ──► CRS transform
//!                                             │
//! ClimateDataSource::fetch_year(year) ──► crop ──► year filter ──► monthly mean
//!                                                                      │
//!                                                                      ▼
//!                                                      MonthlyTemperatureSeries
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod netcdf;
pub mod resample;
mod source;

// Re-exports
pub use aggregate::{TemperatureAggregator, DEFAULT_BUFFER_DIST};
pub use config::ClimateSourceConfig;
pub use error::{IngestionError, Result};
pub use resample::{filter_year, monthly_mean};
pub use source::{ClimateDataSource, S3ClimateSource};
