//! Common types shared across the reference evapotranspiration crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use crs::{CrsCode, CrsParseError};
pub use error::{EtError, EtResult};
pub use grid::{GeoTransform, MonthlyTemperatureSeries, RasterGrid, TimeSeriesGrid};
pub use time::{month_start, parse_year};
