//! Interpolation methods for grid resampling.
//!
//! Positions are fractional `(col, row)` indices where integer values fall on
//! cell centers. Anything more than half a cell outside the grid is NaN;
//! positions inside that margin are clamped to the edge cells.

use ndarray::ArrayView2;

use crate::types::InterpolationMethod;

/// Sample `data` at a fractional position with the given method.
pub fn interpolate(method: InterpolationMethod, data: ArrayView2<f32>, col: f64, row: f64) -> f32 {
    match method {
        InterpolationMethod::Nearest => nearest_interpolate(data, col, row),
        InterpolationMethod::Bilinear => bilinear_interpolate(data, col, row),
    }
}

/// Nearest neighbor interpolation.
///
/// Returns the value of the nearest grid point.
pub fn nearest_interpolate(data: ArrayView2<f32>, col: f64, row: f64) -> f32 {
    let (height, width) = data.dim();
    if !inside(col, width) || !inside(row, height) {
        return f32::NAN;
    }

    let c = (col.round().max(0.0) as usize).min(width - 1);
    let r = (row.round().max(0.0) as usize).min(height - 1);
    data[[r, c]]
}

/// Bilinear interpolation.
///
/// Smoothly interpolates between the four nearest grid points. NaN corners
/// are dropped and the remaining weights renormalized.
pub fn bilinear_interpolate(data: ArrayView2<f32>, col: f64, row: f64) -> f32 {
    let (height, width) = data.dim();
    if !inside(col, width) || !inside(row, height) {
        return f32::NAN;
    }

    let x = col.clamp(0.0, (width - 1) as f64);
    let y = row.clamp(0.0, (height - 1) as f64);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let xf = x - x0 as f64;
    let yf = y - y0 as f64;

    let corners = [
        (data[[y0, x0]], (1.0 - xf) * (1.0 - yf)),
        (data[[y0, x1]], xf * (1.0 - yf)),
        (data[[y1, x0]], (1.0 - xf) * yf),
        (data[[y1, x1]], xf * yf),
    ];

    let mut sum = 0.0f64;
    let mut weight = 0.0f64;
    for (value, w) in corners {
        if value.is_finite() && w > 0.0 {
            sum += value as f64 * w;
            weight += w;
        }
    }

    if weight > 0.0 {
        (sum / weight) as f32
    } else {
        f32::NAN
    }
}

fn inside(pos: f64, len: usize) -> bool {
    len > 0 && pos.is_finite() && pos >= -0.5 && pos <= len as f64 - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_nearest_interpolate() {
        let data = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];

        assert_eq!(nearest_interpolate(data.view(), 0.0, 0.0), 1.0);
        assert_eq!(nearest_interpolate(data.view(), 1.0, 1.0), 5.0);
        assert_eq!(nearest_interpolate(data.view(), 0.4, 0.4), 1.0);
        assert_eq!(nearest_interpolate(data.view(), 0.6, 0.6), 5.0);
        // Half a cell beyond the edge still hits the edge cell.
        assert_eq!(nearest_interpolate(data.view(), -0.4, 2.4), 7.0);
        assert!(nearest_interpolate(data.view(), 3.0, 0.0).is_nan());
    }

    #[test]
    fn test_bilinear_interpolate() {
        let data = array![[1.0f32, 2.0], [3.0, 4.0]];

        // Corners
        assert_eq!(bilinear_interpolate(data.view(), 0.0, 0.0), 1.0);
        assert_eq!(bilinear_interpolate(data.view(), 1.0, 0.0), 2.0);
        assert_eq!(bilinear_interpolate(data.view(), 0.0, 1.0), 3.0);
        assert_eq!(bilinear_interpolate(data.view(), 1.0, 1.0), 4.0);

        // Center
        let center = bilinear_interpolate(data.view(), 0.5, 0.5);
        assert!((center - 2.5).abs() < 0.001);

        // Edge margin clamps
        assert_eq!(bilinear_interpolate(data.view(), -0.25, -0.25), 1.0);
        assert!(bilinear_interpolate(data.view(), -0.75, 0.0).is_nan());
    }

    #[test]
    fn test_bilinear_skips_nan() {
        let data = array![[1.0f32, f32::NAN], [3.0, 4.0]];

        let result = bilinear_interpolate(data.view(), 0.5, 0.5);
        assert!((result - (1.0 + 3.0 + 4.0) / 3.0).abs() < 1e-6);

        let all_nan = array![[f32::NAN, f32::NAN], [f32::NAN, f32::NAN]];
        assert!(bilinear_interpolate(all_nan.view(), 0.5, 0.5).is_nan());
    }

    #[test]
    fn test_single_cell_grid() {
        let data = array![[7.5f32]];
        assert_eq!(bilinear_interpolate(data.view(), 0.3, -0.2), 7.5);
        assert_eq!(interpolate(InterpolationMethod::Nearest, data.view(), 0.0, 0.0), 7.5);
    }
}
