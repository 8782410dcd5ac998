//! Error types for the ingestion crate.

use thiserror::Error;

/// Errors that can occur while retrieving and aggregating climate data.
#[derive(Error, Debug)]
pub enum IngestionError {
    /// The climate data service failed or returned no usable data.
    #[error("Remote climate data error: {0}")]
    RemoteData(String),

    #[error("Failed to parse NetCDF data: {0}")]
    NetcdfParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Projection error: {0}")]
    Projection(String),
}

impl From<netcdf_parser::NetCdfError> for IngestionError {
    fn from(err: netcdf_parser::NetCdfError) -> Self {
        Self::NetcdfParse(err.to_string())
    }
}

impl From<et_common::EtError> for IngestionError {
    fn from(err: et_common::EtError) -> Self {
        Self::RemoteData(err.to_string())
    }
}

impl From<projection::ProjectionError> for IngestionError {
    fn from(err: projection::ProjectionError) -> Self {
        Self::Projection(err.to_string())
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
