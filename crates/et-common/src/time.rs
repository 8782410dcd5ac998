//! Calendar helpers for monthly aggregation.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::EtError;

/// First day of the month containing `t`.
pub fn month_start(t: &NaiveDateTime) -> NaiveDate {
    // Day 1 always exists.
    NaiveDate::from_ymd_opt(t.year(), t.month(), 1).unwrap_or_default()
}

/// First day of the month after `date`'s month.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

/// Every month start from `first` to `last`, inclusive.
pub fn month_range(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = NaiveDate::from_ymd_opt(first.year(), first.month(), 1).unwrap_or(first);
    while current <= last {
        months.push(current);
        current = next_month(current);
    }
    months
}

/// Parse a four-digit calendar year such as `"2019"`.
pub fn parse_year(s: &str) -> Result<i32, EtError> {
    let invalid = |message: &str| EtError::InvalidParameter {
        param: "year".to_string(),
        message: format!("{}: '{}'", message, s),
    };

    let year: i32 = s.trim().parse().map_err(|_| invalid("not an integer"))?;
    if !(1000..=9999).contains(&year) {
        return Err(invalid("expected a four-digit year"));
    }
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_start() {
        let t = date(2019, 8, 17).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(month_start(&t), date(2019, 8, 1));
    }

    #[test]
    fn test_month_range_crosses_year() {
        let months = month_range(date(2019, 11, 1), date(2020, 2, 1));
        assert_eq!(
            months,
            vec![date(2019, 11, 1), date(2019, 12, 1), date(2020, 1, 1), date(2020, 2, 1)]
        );
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2019").unwrap(), 2019);
        assert_eq!(parse_year(" 1981 ").unwrap(), 1981);
        assert!(parse_year("19").is_err());
        assert!(parse_year("twenty").is_err());
    }
}
