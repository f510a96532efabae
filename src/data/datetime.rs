use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Accepted timestamp layouts, tried in order after RFC 3339.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Date-only layouts; these resolve to midnight.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a timestamp string into a second-precision wall-clock instant.
///
/// RFC 3339 values keep the wall-clock time of their own offset. Anything that
/// matches no known layout is an [`Error::InvalidTimestamp`]; callers decide
/// whether to drop or report the entry.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(truncate_to_second(dt.naive_local()));
    }

    for &fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(truncate_to_second(dt));
        }
    }

    for &fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(d.and_time(chrono::NaiveTime::default()));
        }
    }

    Err(Error::InvalidTimestamp(value.to_string()))
}

fn truncate_to_second(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Format a calendar date as a chronologically sortable key.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn to_unix_seconds(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

/// Inverse of [`to_unix_seconds`]; sub-second fractions are dropped.
pub fn from_unix_seconds(secs: f64) -> Option<NaiveDateTime> {
    if !secs.is_finite() {
        return None;
    }
    chrono::DateTime::<chrono::Utc>::from_timestamp(secs.floor() as i64, 0).map(|dt| dt.naive_utc())
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::default())
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the Jan/Apr/Jul/Oct block containing `date`.
pub fn first_of_quarter(date: NaiveDate) -> NaiveDate {
    let month0 = date.month0() - date.month0() % 3;
    NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1).unwrap_or(date)
}

pub fn first_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Monday of the ISO week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(chrono::Days::new(back)).unwrap_or(date)
}

/// Add whole calendar months to the first of a month.
pub fn add_months(month_start: NaiveDate, months: u32) -> Option<NaiveDate> {
    month_start.checked_add_months(Months::new(months))
}

/// Signed month distance `b - a`, ignoring the day of month.
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i32 {
    (b.year() - a.year()) * 12 + b.month() as i32 - a.month() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_layouts() {
        let expected = ymd(2024, 1, 2).and_hms_opt(3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-02T03:04:05").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02 03:04:05").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02T03:04:05.789").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02T03:04:05Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02T03:04:05+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2024-01-02 ").unwrap(), midnight(ymd(2024, 1, 2)));
    }

    #[test]
    fn unparsable_timestamp_is_an_error() {
        let err = parse_timestamp("next tuesday").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp(ref s) if s == "next tuesday"));
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn unix_seconds_round_trip() {
        let ts = ymd(2023, 6, 15).and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(from_unix_seconds(to_unix_seconds(ts)), Some(ts));
        assert_eq!(from_unix_seconds(f64::NAN), None);
    }

    #[test]
    fn calendar_period_starts() {
        // 2024-05-16 is a Thursday.
        let d = ymd(2024, 5, 16);
        assert_eq!(start_of_week(d), ymd(2024, 5, 13));
        assert_eq!(start_of_week(ymd(2024, 5, 13)), ymd(2024, 5, 13));
        assert_eq!(start_of_week(ymd(2024, 5, 19)), ymd(2024, 5, 13));
        assert_eq!(first_of_month(d), ymd(2024, 5, 1));
        assert_eq!(first_of_quarter(d), ymd(2024, 4, 1));
        assert_eq!(first_of_quarter(ymd(2024, 12, 31)), ymd(2024, 10, 1));
        assert_eq!(first_of_year(d), ymd(2024, 1, 1));
    }

    #[test]
    fn month_arithmetic() {
        assert_eq!(add_months(ymd(2023, 11, 1), 3), Some(ymd(2024, 2, 1)));
        assert_eq!(months_between(ymd(2023, 11, 20), ymd(2024, 2, 1)), 3);
        assert_eq!(months_between(ymd(2024, 2, 1), ymd(2023, 11, 20)), -3);
    }
}
