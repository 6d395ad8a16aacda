//! Time source for the journal
//!
//! Everything that depends on "today" or "now" (export date ranges, creation
//! timestamps, migration) takes a [`Clock`] so tests can pin the date.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Source of the current date and timestamp.
pub trait Clock: Send + Sync {
    /// The current calendar date.
    fn today(&self) -> NaiveDate;

    /// The current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall-clock time, local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        local_date_today()
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    /// Pin the clock to midnight (UTC) of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self {
            now: NaiveDateTime::new(date, NaiveTime::MIN),
        }
    }

    /// Pin the clock to an exact instant (interpreted as UTC).
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date()
    }

    fn now_millis(&self) -> i64 {
        self.now.and_utc().timestamp_millis()
    }
}
