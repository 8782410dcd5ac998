//! Native NetCDF parsing using the netcdf library.
//!
//! The netcdf library requires a file path (it wraps libnetcdf/HDF5 which need
//! file handles). When reading from bytes, we write to a temp file first.
//!
//! On Linux, we use `/dev/shm` (memory-backed tmpfs) to minimize I/O latency.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use et_common::CrsCode;
use tracing::{debug, warn};

use crate::cf::{infer_crs_from_axis, TimeUnits, TIME_AXIS_NAME, X_AXIS_NAMES, Y_AXIS_NAMES};
use crate::error::{NetCdfError, NetCdfResult};
use crate::GriddedVariable;

/// Load a `(time, y, x)` variable from NetCDF bytes.
///
/// Values equal to `_FillValue` or `missing_value` become NaN, packed values
/// are unpacked with `scale_factor`/`add_offset`, and rows are reordered so
/// row 0 is the northernmost one.
pub fn load_gridded_netcdf_from_bytes(
    data: &[u8],
    variable: &str,
) -> NetCdfResult<GriddedVariable> {
    let temp_dir = get_optimal_temp_dir();
    let temp_file = temp_dir.join(generate_temp_filename());

    let mut file = std::fs::File::create(&temp_file)?;
    file.write_all(data)?;
    drop(file);

    let result = load_gridded_netcdf(&temp_file, variable);

    // Clean up
    let _ = std::fs::remove_file(&temp_file);

    result
}

/// Load a `(time, y, x)` variable from a NetCDF file on disk.
pub fn load_gridded_netcdf(path: &Path, variable: &str) -> NetCdfResult<GriddedVariable> {
    let nc_file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let var = nc_file
        .variable(variable)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", variable)))?;

    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();
    if dims.len() != 3 || dims[0].0 != TIME_AXIS_NAME {
        return Err(NetCdfError::InvalidFormat(format!(
            "Expected {}(time, y, x), found dimensions {:?}",
            variable,
            dims.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>()
        )));
    }
    let (y_name, height) = dims[1].clone();
    let (x_name, width) = dims[2].clone();
    if !Y_AXIS_NAMES.contains(&y_name.as_str()) || !X_AXIS_NAMES.contains(&x_name.as_str()) {
        return Err(NetCdfError::InvalidFormat(format!(
            "Unrecognized spatial dimensions ({}, {})",
            y_name, x_name
        )));
    }

    let x = read_coordinate(&nc_file, &x_name, width)?;
    let mut y = read_coordinate(&nc_file, &y_name, height)?;
    let times = read_time_axis(&nc_file)?;
    let n_times = dims[0].1;
    if times.len() != n_times {
        return Err(NetCdfError::InvalidFormat(format!(
            "time axis has {} values for {} slices",
            times.len(),
            n_times
        )));
    }

    // Read as f32; the library converts packed integer types.
    let raw: Vec<f32> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", variable, e)))?;

    let scale_factor = get_f32_attr(&var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f32_attr(&var, "add_offset").unwrap_or(0.0);
    let fill_values: Vec<f32> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| get_f32_attr(&var, name))
        .collect();

    let mut values: Vec<f32> = raw
        .iter()
        .map(|&val| {
            if val.is_nan() || fill_values.contains(&val) {
                f32::NAN
            } else {
                val * scale_factor + add_offset
            }
        })
        .collect();

    // Ascending y means row 0 is the southernmost; flip to north-up.
    if height > 1 && y[0] < y[height - 1] {
        flip_rows(&mut values, n_times, height, width);
        y.reverse();
    }

    let crs = grid_mapping_crs(&nc_file, &var).or_else(|| infer_crs_from_axis(&x_name));
    if crs.is_none() {
        warn!(variable, x_axis = %x_name, "Could not determine CRS of NetCDF variable");
    }

    let units = get_string_attr(&var, "units");

    debug!(
        variable,
        n_times,
        width,
        height,
        crs = ?crs,
        "Loaded NetCDF variable"
    );

    Ok(GriddedVariable {
        name: variable.to_string(),
        values,
        times,
        x,
        y,
        crs,
        units,
    })
}

// =============================================================================
// Internal helpers
// =============================================================================

fn read_coordinate(nc_file: &netcdf::File, name: &str, len: usize) -> NetCdfResult<Vec<f64>> {
    let var = nc_file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} coordinate variable", name)))?;
    let values: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
    if values.len() != len {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} has {} values, expected {}",
            name,
            values.len(),
            len
        )));
    }
    Ok(values)
}

fn read_time_axis(nc_file: &netcdf::File) -> NetCdfResult<Vec<chrono::NaiveDateTime>> {
    let var = nc_file
        .variable(TIME_AXIS_NAME)
        .ok_or_else(|| NetCdfError::MissingData("time variable".to_string()))?;
    let units = get_string_attr(&var, "units")
        .ok_or_else(|| NetCdfError::MissingData("time units attribute".to_string()))?;
    let units = TimeUnits::parse(&units)?;

    let raw: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read time: {}", e)))?;
    raw.into_iter().map(|v| units.decode(v)).collect()
}

/// CRS declared by the variable's `grid_mapping` variable, if any.
fn grid_mapping_crs(nc_file: &netcdf::File, var: &netcdf::Variable) -> Option<CrsCode> {
    let mapping_name = get_string_attr(var, "grid_mapping")?;
    let mapping = nc_file.variable(&mapping_name)?;

    for name in ["epsg_code", "crs"] {
        if let Some(code) = get_string_attr(&mapping, name) {
            return CrsCode::parse(&code).ok();
        }
        if let Some(code) = get_f64_attr(&mapping, name) {
            return CrsCode::from_epsg(code as u32).ok();
        }
    }
    None
}

fn flip_rows(values: &mut [f32], n_times: usize, height: usize, width: usize) {
    for t in 0..n_times {
        let slice = &mut values[t * height * width..(t + 1) * height * width];
        for row in 0..height / 2 {
            let (top, bottom) = slice.split_at_mut((height - 1 - row) * width);
            top[row * width..(row + 1) * width].swap_with_slice(&mut bottom[..width]);
        }
    }
}

/// Get the optimal temp directory for NetCDF file operations.
///
/// On Linux, uses /dev/shm (memory-backed tmpfs) if available for faster I/O.
/// Falls back to the system temp directory on other platforms or if /dev/shm is unavailable.
fn get_optimal_temp_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let shm_path = Path::new("/dev/shm");
        if shm_path.is_dir() {
            let test_path = shm_path.join(format!(".netcdf_test_{}", std::process::id()));
            if std::fs::write(&test_path, b"test").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return shm_path.to_path_buf();
            }
        }
    }

    std::env::temp_dir()
}

/// Unique temp file name: process ID, thread ID and a counter.
fn generate_temp_filename() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let tid = std::thread::current().id();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("climate_native_{}_{:?}_{}.nc", pid, tid, count)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f32_attr(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f32::try_from(attr_value).ok()
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_temp_dir() {
        let dir = get_optimal_temp_dir();
        assert!(dir.exists(), "Temp dir should exist");
    }

    #[test]
    fn test_temp_filename_uniqueness() {
        let name1 = generate_temp_filename();
        let name2 = generate_temp_filename();
        assert_ne!(name1, name2, "Temp filenames should be unique");
    }

    #[test]
    fn test_flip_rows() {
        // two slices of 3 rows x 2 cols
        let mut values: Vec<f32> = (0..12).map(|v| v as f32).collect();
        flip_rows(&mut values, 2, 3, 2);
        assert_eq!(
            values,
            vec![4.0, 5.0, 2.0, 3.0, 0.0, 1.0, 10.0, 11.0, 8.0, 9.0, 6.0, 7.0]
        );
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = load_gridded_netcdf_from_bytes(b"not a netcdf file", "TabsD").unwrap_err();
        assert!(matches!(err, NetCdfError::InvalidFormat(_)));
    }
}
