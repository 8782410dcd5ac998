//! Error types for grid processing.

use thiserror::Error;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// The reference raster holds no valid pixel.
    #[error("reference raster has no valid-data region")]
    EmptyExtent,

    /// A grid cannot be aligned onto the reference grid.
    #[error("cannot align grids: {0}")]
    MisalignedGrid(String),

    /// Failed to read a raster.
    #[error("failed to read raster: {0}")]
    ReadFailed(String),

    /// Failed to write a raster.
    #[error("failed to write raster: {0}")]
    WriteFailed(String),

    /// Missing or malformed georeferencing.
    #[error("invalid raster metadata: {0}")]
    InvalidMetadata(String),

    /// Coordinate transformation error.
    #[error("projection error: {0}")]
    Projection(String),
}

impl GridProcessorError {
    /// Create a ReadFailed error.
    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    /// Create a WriteFailed error.
    pub fn write_failed(msg: impl Into<String>) -> Self {
        Self::WriteFailed(msg.into())
    }

    /// Create an InvalidMetadata error.
    pub fn invalid_metadata(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }

    /// Create a MisalignedGrid error.
    pub fn misaligned(msg: impl Into<String>) -> Self {
        Self::MisalignedGrid(msg.into())
    }
}

impl From<std::io::Error> for GridProcessorError {
    fn from(err: std::io::Error) -> Self {
        Self::ReadFailed(err.to_string())
    }
}

impl From<tiff::TiffError> for GridProcessorError {
    fn from(err: tiff::TiffError) -> Self {
        Self::ReadFailed(err.to_string())
    }
}

impl From<projection::ProjectionError> for GridProcessorError {
    fn from(err: projection::ProjectionError) -> Self {
        Self::Projection(err.to_string())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
