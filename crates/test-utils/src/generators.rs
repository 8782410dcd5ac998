//! Synthetic climate data generators.
//!
//! These generators create predictable, verifiable series that can be used
//! across the test suite.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use et_common::{CrsCode, GeoTransform, MonthlyTemperatureSeries, TimeSeriesGrid};
use ndarray::{Array2, Array3};

/// Monthly means for the Jonction end-to-end scenario (°C), January first.
///
/// The hottest month is August (index 7) at 27 °C.
pub const JONCTION_MONTHLY_MEANS: [f32; 12] =
    [-2.0, 0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 27.0, 24.0, 15.0, 5.0, -1.0];

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.dim(), (5, 10));
/// assert_eq!(grid[[0, 1]], 1000.0); // col=1, row=0
/// assert_eq!(grid[[1, 0]], 1.0);    // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Array2<f32> {
    Array2::from_shape_fn((height, width), |(row, col)| (col * 1000 + row) as f32)
}

/// Monthly series where every pixel of month `i` holds `values[i]`.
///
/// Months start in January of `year` and run for `values.len()` months.
pub fn uniform_monthly_series(
    values: &[f32],
    year: i32,
    width: usize,
    height: usize,
    transform: GeoTransform,
    crs: CrsCode,
) -> MonthlyTemperatureSeries {
    let data = Array3::from_shape_fn((values.len(), height, width), |(m, _, _)| values[m]);
    let months = (0..values.len())
        .map(|m| month_of(year, m))
        .collect();

    MonthlyTemperatureSeries {
        data,
        months,
        transform,
        crs,
    }
}

/// Monthly series with a per-pixel offset: month `i`, pixel `(row, col)`
/// holds `values[i] + offset(row, col)`.
pub fn monthly_series_with_offsets<F>(
    values: &[f32],
    year: i32,
    width: usize,
    height: usize,
    transform: GeoTransform,
    crs: CrsCode,
    offset: F,
) -> MonthlyTemperatureSeries
where
    F: Fn(usize, usize) -> f32,
{
    let mut series = uniform_monthly_series(values, year, width, height, transform, crs);
    for ((_, row, col), value) in series.data.indexed_iter_mut() {
        *value += offset(row, col);
    }
    series
}

/// Daily series for every day of `year`, uniform in space.
///
/// `daily` maps each date to the value of every pixel on that day.
pub fn daily_series<F>(
    year: i32,
    width: usize,
    height: usize,
    transform: GeoTransform,
    crs: CrsCode,
    daily: F,
) -> TimeSeriesGrid
where
    F: Fn(NaiveDate) -> f32,
{
    let times: Vec<NaiveDateTime> = days_of_year(year)
        .into_iter()
        .filter_map(|d| d.and_hms_opt(12, 0, 0))
        .collect();
    let data = Array3::from_shape_fn((times.len(), height, width), |(t, _, _)| {
        daily(times[t].date())
    });

    TimeSeriesGrid {
        data,
        times,
        transform,
        crs,
    }
}

/// Daily temperatures whose monthly means equal [`JONCTION_MONTHLY_MEANS`].
///
/// Each month alternates `mean - 1` and `mean + 1` and ends on the mean, so
/// any month length averages back to the mean.
pub fn jonction_daily_temperature(date: NaiveDate) -> f32 {
    let mean = JONCTION_MONTHLY_MEANS[date.month0() as usize];
    let days = days_in_month(date.year(), date.month());
    let day = date.day();

    if days % 2 == 1 && day == days {
        mean
    } else if day % 2 == 1 {
        mean - 1.0
    } else {
        mean + 1.0
    }
}

fn month_of(year: i32, index: usize) -> NaiveDate {
    let year = year + (index / 12) as i32;
    let month = (index % 12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid month")
}

fn days_of_year(year: i32) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid year");
    start
        .iter_days()
        .take_while(|d| d.year() == year)
        .collect()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid month");
    next.pred_opt().expect("valid date").day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> GeoTransform {
        GeoTransform::new(2_499_000.0, 1_118_000.0, 1000.0, -1000.0)
    }

    #[test]
    fn test_uniform_monthly_series() {
        let series = uniform_monthly_series(
            &JONCTION_MONTHLY_MEANS,
            2019,
            2,
            3,
            transform(),
            CrsCode::Epsg2056,
        );
        assert_eq!(series.data.shape(), &[12, 3, 2]);
        assert_eq!(series.months[7], NaiveDate::from_ymd_opt(2019, 8, 1).unwrap());
        assert_eq!(series.data[[7, 2, 1]], 27.0);
    }

    #[test]
    fn test_daily_series_averages_to_monthly_means() {
        let series = daily_series(2020, 1, 1, transform(), CrsCode::Epsg2056, jonction_daily_temperature);
        assert_eq!(series.len(), 366);

        for month in 1..=12u32 {
            let values: Vec<f32> = series
                .times
                .iter()
                .zip(series.data.iter())
                .filter(|(t, _)| t.month() == month)
                .map(|(_, v)| *v)
                .collect();
            let mean = values.iter().sum::<f32>() / values.len() as f32;
            assert!(
                (mean - JONCTION_MONTHLY_MEANS[month as usize - 1]).abs() < 1e-5,
                "month {} mean {}",
                month,
                mean
            );
        }
    }

    #[test]
    fn test_offsets() {
        let series = monthly_series_with_offsets(&[10.0], 2019, 2, 1, transform(), CrsCode::Epsg2056, |_, col| col as f32);
        assert_eq!(series.data[[0, 0, 1]], 11.0);
    }
}
