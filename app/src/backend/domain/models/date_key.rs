//! Canonical `YYYY-MM-DD` date keys shared by marks, cells and the special day table.
use chrono::{Datelike, NaiveDate};

/// Format a date key from its components. Months and days are zero-padded.
pub fn date_key(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Parse a date key, accepting only valid dates in canonical zero-padded form
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
    if date_key(date.year(), date.month(), date.day()) == key {
        Some(date)
    } else {
        None
    }
}

/// Number of days in a month, `None` for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next_first - first).num_days()).ok()
}
