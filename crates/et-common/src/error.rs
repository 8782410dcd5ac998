//! Error types shared by the evapotranspiration crates.

use thiserror::Error;

use crate::crs::CrsParseError;

/// Result type alias using EtError.
pub type EtResult<T> = Result<T, EtError>;

/// Errors raised by shared infrastructure (CRS handling, storage access).
#[derive(Debug, Error)]
pub enum EtError {
    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for EtError {
    fn from(err: std::io::Error) -> Self {
        EtError::Internal(err.to_string())
    }
}

impl From<CrsParseError> for EtError {
    fn from(err: CrsParseError) -> Self {
        EtError::InvalidCrs(err.to_string())
    }
}
