//! Coordinate reference system transformations.
//!
//! Implements the handful of projections the pipeline meets (Swiss LV95/LV03,
//! WGS84, Web Mercator) from scratch without external dependencies.

pub mod mercator;
pub mod swiss;
pub mod transform;

pub use swiss::SwissGrid;
pub use transform::{CrsTransform, ProjectionError};
