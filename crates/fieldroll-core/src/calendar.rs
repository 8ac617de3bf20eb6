//! Calendar rules for reporting months
//!
//! Tickets are attributed to a reporting month with a billing cutoff on the
//! 25th: anything closing on the 26th or later rolls into the next month.
//! This module also owns the timestamp formats accepted on input and the
//! formats written on output.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

/// Last day of the month that still reports in the same month
pub const BILLING_CUTOFF_DAY: u32 = 25;

/// Format used when writing timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used when writing calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Map a date to the first day of its reporting month
///
/// Days up to and including the 25th report in their own month; later days
/// report in the following month.
///
/// # Examples
/// ```
/// use fieldroll_core::calendar::adjust_month;
/// use chrono::NaiveDate;
///
/// let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// assert_eq!(adjust_month(d(2024, 3, 25)), d(2024, 3, 1));
/// assert_eq!(adjust_month(d(2024, 3, 26)), d(2024, 4, 1));
/// assert_eq!(adjust_month(d(2024, 12, 26)), d(2025, 1, 1));
/// ```
pub fn adjust_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    if date.day() <= BILLING_CUTOFF_DAY {
        first
    } else {
        first
            .checked_add_months(Months::new(1))
            .expect("month after a parsed date is representable")
    }
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

/// Number of calendar days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // Only reachable in the last representable month, which is December
        None => 31,
    }
}

/// Parse an input timestamp
///
/// Accepts ISO-8601 date-times (space or `T` separated, optional fractional
/// seconds), US-style `%m/%d/%Y` date-times, and bare dates, which are taken
/// as midnight. Surrounding whitespace is ignored.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_INPUT_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Format a timestamp for output
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Format a date for output
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_adjust_month_cutoff() {
        assert_eq!(adjust_month(d(2024, 3, 1)), d(2024, 3, 1));
        assert_eq!(adjust_month(d(2024, 3, 25)), d(2024, 3, 1));
        assert_eq!(adjust_month(d(2024, 3, 26)), d(2024, 4, 1));
        assert_eq!(adjust_month(d(2024, 3, 31)), d(2024, 4, 1));
    }

    #[test]
    fn test_adjust_month_year_rollover() {
        assert_eq!(adjust_month(d(2024, 12, 26)), d(2025, 1, 1));
        assert_eq!(adjust_month(d(2024, 12, 25)), d(2024, 12, 1));
    }

    #[test]
    fn test_adjust_month_short_february() {
        assert_eq!(adjust_month(d(2023, 2, 26)), d(2023, 3, 1));
        assert_eq!(adjust_month(d(2024, 2, 29)), d(2024, 3, 1));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(d(2024, 1, 1)), 31);
        assert_eq!(days_in_month(d(2024, 2, 1)), 29);
        assert_eq!(days_in_month(d(2023, 2, 14)), 28);
        assert_eq!(days_in_month(d(2024, 4, 30)), 30);
        assert_eq!(days_in_month(d(2024, 12, 1)), 31);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = d(2024, 1, 5).and_hms_opt(13, 45, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05 13:45:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T13:45:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05 13:45"), Some(expected));
        assert_eq!(parse_timestamp("01/05/2024 13:45"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-01-05 13:45:00.000 "), Some(expected));

        let midnight = d(2024, 1, 5).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05"), Some(midnight));
        assert_eq!(parse_timestamp("1/5/2024"), Some(midnight));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn test_formatting() {
        let ts = d(2024, 1, 5).and_hms_opt(7, 8, 9).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-05 07:08:09");
        assert_eq!(format_date(&d(2024, 1, 1)), "2024-01-01");
    }
}
