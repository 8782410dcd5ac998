//! Conversion of decoded NetCDF variables into georeferenced time series.

use et_common::{GeoTransform, TimeSeriesGrid};
use ndarray::Array3;
use netcdf_parser::{load_gridded_netcdf_from_bytes, GriddedVariable};

use crate::error::{IngestionError, Result};

/// Decode `variable` from NetCDF bytes into a `(time, row, col)` grid.
pub fn series_from_netcdf(data: &[u8], variable: &str) -> Result<TimeSeriesGrid> {
    let var = load_gridded_netcdf_from_bytes(data, variable)?;
    series_from_variable(var)
}

/// Build the grid transform from cell-center coordinates.
///
/// Coordinates must be evenly spaced; the cell size is taken from the first
/// two values of each axis.
pub fn series_from_variable(var: GriddedVariable) -> Result<TimeSeriesGrid> {
    let crs = var.crs.ok_or_else(|| {
        IngestionError::NetcdfParse(format!("{} has no recognizable CRS", var.name))
    })?;

    let (width, height, n_times) = (var.width(), var.height(), var.n_times());
    if width < 2 || height < 2 {
        return Err(IngestionError::NetcdfParse(format!(
            "{} grid is {}x{}, cannot infer cell size",
            var.name, width, height
        )));
    }

    let dx = var.x[1] - var.x[0];
    let dy = var.y[1] - var.y[0];
    if !(dx > 0.0) || !(dy < 0.0) {
        return Err(IngestionError::NetcdfParse(format!(
            "{} axes are not west-east / north-south (dx={}, dy={})",
            var.name, dx, dy
        )));
    }

    let transform = GeoTransform::new(var.x[0] - dx / 2.0, var.y[0] - dy / 2.0, dx, dy);
    let data = Array3::from_shape_vec((n_times, height, width), var.values)
        .map_err(|e| IngestionError::NetcdfParse(e.to_string()))?;

    Ok(TimeSeriesGrid {
        data,
        times: var.times,
        transform,
        crs,
    })
}
