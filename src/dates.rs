//! Calendar helpers shared by the recurrence engine and the export filter

use crate::error::{Error, Result};
use chrono::{Datelike, Days, Months, NaiveDate};

/// Wire format for dates (`YYYY-MM-DD`)
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).map_err(|_| Error::InvalidDateFormat {
        input: input.to_string(),
    })
}

/// Format a date as `YYYY-MM-DD`
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Add whole months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Add whole years; Feb 29 lands on Feb 28 in non-leap years.
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    add_months(date, years.checked_mul(12)?)
}

/// Add whole days
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    match add_months(first, 1) {
        Some(next_first) => (next_first - first).num_days() as u32,
        // December of the last representable year
        None => 31,
    }
}

/// Monday and Sunday of the ISO week containing `date`
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from_monday = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(from_monday)).unwrap_or(date);
    let sunday = add_days(monday, 6).unwrap_or(monday);
    (monday, sunday)
}
