//! CF conventions helpers: time units, axis names and CRS inference.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use et_common::CrsCode;

use crate::error::{NetCdfError, NetCdfResult};

/// Names accepted for the easting / longitude axis.
pub const X_AXIS_NAMES: &[&str] = &["x", "chx", "E", "lon", "longitude"];

/// Names accepted for the northing / latitude axis.
pub const Y_AXIS_NAMES: &[&str] = &["y", "chy", "N", "lat", "latitude"];

/// Name of the time axis.
pub const TIME_AXIS_NAME: &str = "time";

/// Unit of a CF `<unit> since <epoch>` time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
            TimeUnit::Days => 86_400.0,
        }
    }
}

/// Parsed CF time `units` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub epoch: NaiveDateTime,
}

impl TimeUnits {
    /// Parse strings such as `"days since 1900-01-01 00:00:00"`.
    pub fn parse(units: &str) -> NetCdfResult<Self> {
        let invalid = || NetCdfError::InvalidFormat(format!("Unsupported time units: '{}'", units));

        let (unit, epoch) = units.trim().split_once(" since ").ok_or_else(invalid)?;
        let unit = match unit.trim().to_lowercase().as_str() {
            "seconds" | "second" | "s" => TimeUnit::Seconds,
            "minutes" | "minute" | "min" => TimeUnit::Minutes,
            "hours" | "hour" | "h" => TimeUnit::Hours,
            "days" | "day" | "d" => TimeUnit::Days,
            _ => return Err(invalid()),
        };

        let epoch = parse_epoch(epoch.trim()).ok_or_else(invalid)?;
        Ok(Self { unit, epoch })
    }

    /// Timestamp of an axis value expressed in these units.
    pub fn decode(&self, value: f64) -> NetCdfResult<NaiveDateTime> {
        if !value.is_finite() {
            return Err(NetCdfError::InvalidFormat(format!(
                "Non-finite time value: {}",
                value
            )));
        }
        let millis = (value * self.unit.seconds() * 1000.0).round() as i64;
        Ok(self.epoch + Duration::milliseconds(millis))
    }
}

fn parse_epoch(s: &str) -> Option<NaiveDateTime> {
    // Drop a trailing UTC designator, e.g. "1900-01-01 00:00:00 UTC" or "...Z".
    let s = s
        .trim_end_matches(" UTC")
        .trim_end_matches(" utc")
        .trim_end_matches('Z');

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Guess the CRS from the name of the x axis when no grid mapping declares it.
pub fn infer_crs_from_axis(x_name: &str) -> Option<CrsCode> {
    match x_name {
        "chx" => Some(CrsCode::Epsg21781),
        "E" => Some(CrsCode::Epsg2056),
        "lon" | "longitude" => Some(CrsCode::Epsg4326),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days_since() {
        let units = TimeUnits::parse("days since 1900-01-01 00:00:00").unwrap();
        assert_eq!(units.unit, TimeUnit::Days);

        let t = units.decode(43_464.0).unwrap();
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_hours_since_date_only() {
        let units = TimeUnits::parse("hours since 2019-01-01").unwrap();
        let t = units.decode(36.0).unwrap();
        assert_eq!(
            t,
            NaiveDate::from_ymd_opt(2019, 1, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimeUnits::parse("fortnights since 2019-01-01").is_err());
        assert!(TimeUnits::parse("days").is_err());
        assert!(TimeUnits::parse("days since yesterday").is_err());
    }

    #[test]
    fn test_infer_crs() {
        assert_eq!(infer_crs_from_axis("chx"), Some(CrsCode::Epsg21781));
        assert_eq!(infer_crs_from_axis("E"), Some(CrsCode::Epsg2056));
        assert_eq!(infer_crs_from_axis("lon"), Some(CrsCode::Epsg4326));
        assert_eq!(infer_crs_from_axis("x"), None);
    }
}
