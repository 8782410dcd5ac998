//! Hottest-month selection.

use et_common::MonthlyTemperatureSeries;

/// Spatial mean of each month, skipping NaN. All-NaN months are NaN.
pub fn spatial_means(series: &MonthlyTemperatureSeries) -> Vec<f64> {
    (0..series.len())
        .map(|i| {
            let (sum, count) = series
                .month(i)
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0f64, 0usize), |(s, c), &v| (s + v as f64, c + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        })
        .collect()
}

/// Index of the month with the highest spatial mean; the first one wins ties.
///
/// NaN means are ignored. Returns `None` for an empty series and `Some(0)`
/// when every month is NaN.
pub fn hottest_month(series: &MonthlyTemperatureSeries) -> Option<usize> {
    if series.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, mean) in spatial_means(series).into_iter().enumerate() {
        if mean.is_nan() {
            continue;
        }
        match best {
            Some((_, best_mean)) if mean <= best_mean => {}
            _ => best = Some((i, mean)),
        }
    }
    Some(best.map_or(0, |(i, _)| i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use et_common::{CrsCode, GeoTransform};
    use test_utils::{monthly_series_with_offsets, uniform_monthly_series, JONCTION_MONTHLY_MEANS};

    fn transform() -> GeoTransform {
        GeoTransform::new(0.0, 2.0, 1.0, -1.0)
    }

    #[test]
    fn test_jonction_hottest_is_august() {
        let series =
            uniform_monthly_series(&JONCTION_MONTHLY_MEANS, 2019, 1, 1, transform(), CrsCode::Epsg2056);
        assert_eq!(hottest_month(&series), Some(7));
    }

    #[test]
    fn test_first_maximum_wins() {
        let series =
            uniform_monthly_series(&[10.0, 20.0, 20.0, 5.0], 2019, 2, 2, transform(), CrsCode::Epsg2056);
        assert_eq!(hottest_month(&series), Some(1));
    }

    #[test]
    fn test_nan_pixels_and_months_ignored() {
        // Pixel (0, 0) is missing everywhere; month 2 is missing entirely.
        let mut series =
            monthly_series_with_offsets(&[10.0, 12.0, 50.0], 2019, 2, 1, transform(), CrsCode::Epsg2056, |_, _| 0.0);
        series.data[[0, 0, 0]] = f32::NAN;
        series.data[[1, 0, 0]] = f32::NAN;
        series.data[[2, 0, 0]] = f32::NAN;
        series.data[[2, 0, 1]] = f32::NAN;

        assert_eq!(spatial_means(&series)[1], 12.0);
        assert_eq!(hottest_month(&series), Some(1));
    }

    #[test]
    fn test_all_nan_and_empty() {
        let series = uniform_monthly_series(&[f32::NAN, f32::NAN], 2019, 1, 1, transform(), CrsCode::Epsg2056);
        assert_eq!(hottest_month(&series), Some(0));

        let empty = uniform_monthly_series(&[], 2019, 1, 1, transform(), CrsCode::Epsg2056);
        assert_eq!(hottest_month(&empty), None);
    }
}
