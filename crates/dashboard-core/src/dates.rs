//! Calendar-date parsing for CSV cells.
//!
//! Sales files carry ISO-like date strings. Some exports append a midnight
//! time component; that component is dropped so every comparison happens at
//! day granularity.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{DashboardError, Result};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date cell into a [`NaiveDate`].
///
/// Accepts `2021-01-15`, `2021/01/15`, `2021-01-15 00:00:00`,
/// `2021-01-15T00:00:00` and full RFC 3339 timestamps. Any time-of-day
/// component is discarded.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use dashboard_core::dates::parse_date;
///
/// let d = parse_date("2021-01-15").unwrap();
/// assert_eq!(d, NaiveDate::from_ymd_opt(2021, 1, 15).unwrap());
/// assert_eq!(parse_date("2021-01-15 13:45:00").unwrap(), d);
/// assert!(parse_date("15 Jan").is_err());
/// ```
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(DashboardError::DateParse(s.to_string()))
}

/// Canonical string form written to the merged file (`%Y-%m-%d`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
