//! Annual heat index and the Thornthwaite exponent.

use et_common::MonthlyTemperatureSeries;
use ndarray::{Array2, ArrayView2, Axis, Zip};

/// Exponent of the monthly heat index term.
pub const HEAT_INDEX_EXPONENT: f64 = 1.514;

/// Monthly heat index term `(t / 5)^1.514`.
///
/// Undefined (NaN) for negative or non-finite temperatures.
pub fn monthly_term(t: f64) -> f64 {
    (t / 5.0).powf(HEAT_INDEX_EXPONENT)
}

/// Annual heat index `I = Σ (T / 5)^1.514` per pixel.
///
/// Months whose term is undefined (below 0 °C, or missing) contribute
/// nothing, so a pixel without any warm month has `I = 0`.
pub fn heat_index(series: &MonthlyTemperatureSeries) -> Array2<f64> {
    let mut index = Array2::<f64>::zeros((series.height(), series.width()));
    for month in series.data.axis_iter(Axis(0)) {
        Zip::from(&mut index).and(&month).for_each(|acc, &t| {
            let term = monthly_term(t as f64);
            if term.is_finite() {
                *acc += term;
            }
        });
    }
    index
}

/// Thornthwaite exponent `α = 0.49239 + 0.01792·I − 7.71771e-5·I² + 6.75e-7·I³`.
pub fn alpha(heat_index: f64) -> f64 {
    let i = heat_index;
    0.49239 + 0.01792 * i - 0.0000771771 * i.powi(2) + 0.000000675 * i.powi(3)
}

/// Elementwise [`alpha`].
pub fn alpha_grid(heat_index: ArrayView2<f64>) -> Array2<f64> {
    heat_index.mapv(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use et_common::{CrsCode, GeoTransform};
    use test_utils::{assert_approx_eq, uniform_monthly_series, JONCTION_MONTHLY_MEANS};

    #[test]
    fn test_heat_index_uses_positive_months_only() {
        let series = uniform_monthly_series(
            &JONCTION_MONTHLY_MEANS,
            2019,
            1,
            1,
            GeoTransform::new(0.0, 1.0, 1.0, -1.0),
            CrsCode::Epsg2056,
        );
        let expected: f64 = JONCTION_MONTHLY_MEANS
            .iter()
            .filter(|&&t| t > 0.0)
            .map(|&t| (t as f64 / 5.0).powf(1.514))
            .sum();

        let index = heat_index(&series);
        assert_approx_eq!(index[[0, 0]], expected, 1e-9);
        assert_approx_eq!(index[[0, 0]], 58.599312, 1e-5);
    }

    #[test]
    fn test_cold_year_has_zero_index() {
        let series = uniform_monthly_series(
            &[-5.0, 0.0, f32::NAN],
            2019,
            2,
            2,
            GeoTransform::new(0.0, 2.0, 1.0, -1.0),
            CrsCode::Epsg2056,
        );
        assert!(heat_index(&series).iter().all(|&i| i == 0.0));
    }

    #[test]
    fn test_alpha() {
        assert_approx_eq!(alpha(0.0), 0.49239, 1e-12);
        assert_approx_eq!(alpha(58.59931237477878), 1.413298329350183, 1e-9);
    }
}
