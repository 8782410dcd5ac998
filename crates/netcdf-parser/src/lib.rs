//! NetCDF parser for gridded climate products.
//!
//! Reads CF-style gridded variables shaped `(time, y, x)` such as the
//! MeteoSwiss daily mean temperature product (`TabsD`), decoding fill values,
//! packing attributes and CF time units, and returning the grid north-up
//! together with its coordinate axes and CRS.

pub mod cf;
pub mod error;
pub mod native;

use chrono::NaiveDateTime;
use et_common::CrsCode;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{load_gridded_netcdf, load_gridded_netcdf_from_bytes};

/// A decoded `(time, y, x)` variable.
#[derive(Debug, Clone)]
pub struct GriddedVariable {
    /// Variable name in the file
    pub name: String,
    /// Values in `(time, row, col)` order, row 0 northernmost; fill values are NaN
    pub values: Vec<f32>,
    /// Decoded time axis
    pub times: Vec<NaiveDateTime>,
    /// Cell-center x coordinates, west to east
    pub x: Vec<f64>,
    /// Cell-center y coordinates, north to south
    pub y: Vec<f64>,
    /// CRS of the x/y axes, when it could be determined
    pub crs: Option<CrsCode>,
    /// `units` attribute of the variable
    pub units: Option<String>,
}

impl GriddedVariable {
    pub fn width(&self) -> usize {
        self.x.len()
    }

    pub fn height(&self) -> usize {
        self.y.len()
    }

    pub fn n_times(&self) -> usize {
        self.times.len()
    }
}
