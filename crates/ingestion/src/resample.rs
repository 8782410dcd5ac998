//! Temporal aggregation to calendar months.

use chrono::Datelike;
use et_common::time::month_range;
use et_common::{month_start, MonthlyTemperatureSeries, TimeSeriesGrid};
use ndarray::{s, Array3, Axis};

/// Keep only the samples falling in calendar `year`.
///
/// Returns `None` when no sample does.
pub fn filter_year(series: &TimeSeriesGrid, year: i32) -> Option<TimeSeriesGrid> {
    let keep: Vec<usize> = series
        .times
        .iter()
        .enumerate()
        .filter(|(_, t)| t.year() == year)
        .map(|(i, _)| i)
        .collect();
    if keep.is_empty() {
        return None;
    }

    Some(TimeSeriesGrid {
        data: series.data.select(Axis(0), &keep),
        times: keep.iter().map(|&i| series.times[i]).collect(),
        transform: series.transform,
        crs: series.crs,
    })
}

/// Mean of each calendar month, binned on the first of the month.
///
/// Bins run from the month of the earliest sample to the month of the
/// latest one. NaN samples are skipped; a month without any finite sample is
/// NaN. Transform and CRS carry over unchanged.
pub fn monthly_mean(series: &TimeSeriesGrid) -> MonthlyTemperatureSeries {
    let (height, width) = (series.height(), series.width());

    let first = series.times.iter().min().map(month_start);
    let last = series.times.iter().max().map(month_start);
    let months = match (first, last) {
        (Some(first), Some(last)) => month_range(first, last),
        _ => Vec::new(),
    };

    let mut sums = Array3::<f64>::zeros((months.len(), height, width));
    let mut counts = Array3::<u32>::zeros((months.len(), height, width));

    for (t, time) in series.times.iter().enumerate() {
        let month = month_start(time);
        // `months` is sorted and covers every sample month.
        let Ok(bin) = months.binary_search(&month) else {
            continue;
        };
        let sample = series.data.slice(s![t, .., ..]);
        let mut bin_sums = sums.slice_mut(s![bin, .., ..]);
        let mut bin_counts = counts.slice_mut(s![bin, .., ..]);
        ndarray::Zip::from(&mut bin_sums)
            .and(&mut bin_counts)
            .and(&sample)
            .for_each(|sum, count, &value| {
                if !value.is_nan() {
                    *sum += value as f64;
                    *count += 1;
                }
            });
    }

    let mut data = Array3::<f32>::from_elem((months.len(), height, width), f32::NAN);
    ndarray::Zip::from(&mut data)
        .and(&sums)
        .and(&counts)
        .for_each(|out, &sum, &count| {
            if count > 0 {
                *out = (sum / count as f64) as f32;
            }
        });

    MonthlyTemperatureSeries {
        data,
        months,
        transform: series.transform,
        crs: series.crs,
    }
}
