//! Astronomical day length.
//!
//! Declination and sunset hour angle follow FAO-56 (Allen et al., 1998).

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};

/// Days per month in a non-leap year.
const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Solar declination (rad) for day of year `doy` (1 = 1 January).
pub fn solar_declination(doy: u32) -> f64 {
    0.409 * (2.0 * PI / 365.0 * doy as f64 - 1.39).sin()
}

/// Sunset hour angle (rad) at latitude `lat` (rad) for declination `dec` (rad).
///
/// The argument of `acos` is clamped so polar day and night yield π and 0.
pub fn sunset_hour_angle(lat: f64, dec: f64) -> f64 {
    (-lat.tan() * dec.tan()).clamp(-1.0, 1.0).acos()
}

/// Daylight hours at latitude `lat` (rad) on day of year `doy`.
pub fn daylight_hours(lat: f64, doy: u32) -> f64 {
    24.0 / PI * sunset_hour_angle(lat, solar_declination(doy))
}

/// Mean daylight hours of each calendar month at latitude `lat` (rad).
///
/// With `year = None` a non-leap calendar is used.
pub fn monthly_mean_daylight_hours(lat: f64, year: Option<i32>) -> [f64; 12] {
    let mut means = [0.0; 12];
    let mut doy = 0u32;

    for (month, mean) in means.iter_mut().enumerate() {
        let days = match year {
            Some(y) => days_in_month(y, month as u32 + 1),
            None => MONTH_DAYS[month],
        };
        let total: f64 = (1..=days)
            .map(|day| daylight_hours(lat, doy + day))
            .sum();
        *mean = total / days as f64;
        doy += days;
    }
    means
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(MONTH_DAYS[(month as usize - 1) % 12])
}
