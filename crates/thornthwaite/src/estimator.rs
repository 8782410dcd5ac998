//! Thornthwaite PET for the hottest month of a monthly series.

use chrono::{Datelike, NaiveDate};
use et_common::{MonthlyTemperatureSeries, RasterGrid};
use ndarray::Array2;
use tracing::{debug, info, instrument, warn};

use crate::daylight::monthly_mean_daylight_hours;
use crate::heat_index::{alpha_grid, heat_index};
use crate::hottest::hottest_month;
use crate::regimes::raw_pet;

/// PET of the hottest month with the inputs that produced it.
#[derive(Debug, Clone)]
pub struct PetGrid {
    /// Day-length corrected PET (mm/month), tagged with the series' CRS.
    pub grid: RasterGrid,
    /// Index of the hottest month in the series.
    pub hottest_index: usize,
    /// First day of the hottest month, `None` for an empty series.
    pub hottest_month: Option<NaiveDate>,
    /// Mean daylight hours of the hottest month divided by 12.
    pub daylight_factor: f64,
}

impl PetGrid {
    pub fn into_grid(self) -> RasterGrid {
        self.grid
    }
}

/// Thornthwaite (1948) estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PetEstimator;

impl PetEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate PET for the hottest month of `series` at `latitude` (rad).
    ///
    /// Never fails: missing or malformed temperatures surface as NaN pixels,
    /// and an empty series yields an all-NaN grid.
    #[instrument(skip(self, series), fields(months = series.len()))]
    pub fn estimate(&self, series: &MonthlyTemperatureSeries, latitude: f64) -> PetGrid {
        let shape = (series.height(), series.width());
        let Some(hottest_index) = hottest_month(series) else {
            warn!("Empty monthly series, PET is undefined");
            return PetGrid {
                grid: RasterGrid::new(
                    Array2::from_elem(shape, f32::NAN),
                    series.transform,
                    Some(series.crs),
                ),
                hottest_index: 0,
                hottest_month: None,
                daylight_factor: f64::NAN,
            };
        };
        let month = series.months[hottest_index];

        let index = heat_index(series);
        let alpha = alpha_grid(index.view());
        let pet = raw_pet(series.month(hottest_index), index.view(), alpha.view());

        let daylight = monthly_mean_daylight_hours(latitude, None);
        let daylight_factor = daylight[month.month0() as usize] / 12.0;
        debug!(
            latitude,
            daylight_hours = daylight[month.month0() as usize],
            "Day-length correction"
        );

        let data = pet.mapv(|p| (p * daylight_factor) as f32);

        info!(
            hottest_index,
            hottest_month = %month,
            daylight_factor,
            "Estimated Thornthwaite PET"
        );

        PetGrid {
            grid: RasterGrid::new(data, series.transform, Some(series.crs)),
            hottest_index,
            hottest_month: Some(month),
            daylight_factor,
        }
    }
}
