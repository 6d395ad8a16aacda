//! Recurrence expansion
//!
//! Turns a start date and a [`RecurrenceConfig`] into the concrete list of
//! dates the rule produces. Expansion is bounded three ways: the caller's
//! `limit`, an absolute ceiling of [`MAX_OCCURRENCES`], and a hard end one
//! year after the start date (a user `end_date` can only shorten that).
//!
//! # Invariants
//! - Output is strictly increasing.
//! - No date is later than `start + 1 year`.
//! - At most `min(limit, MAX_OCCURRENCES)` dates are produced.
//!
//! The rule itself is never stored as a live series: each generated bullet
//! carries the rule as JSON for display only.

use crate::clock::Clock;
use crate::dates::{self, add_days, add_months, add_years};
use crate::error::{Error, Result};
use crate::journal::{Bullet, BulletState, BulletType};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

/// Default number of occurrences generated for one series
pub const DEFAULT_LIMIT: usize = 52;

/// Absolute ceiling on occurrences, whatever limit the caller asks for
pub const MAX_OCCURRENCES: usize = 366;

/// How often a series repeats
///
/// Uses snake_case naming to match serialization format.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// Every `interval` days
    daily,
    /// Every `interval` weeks, same weekday as the start
    weekly,
    /// Every `interval` months, by fixed day or relative weekday
    monthly,
    /// Every `interval` years
    yearly,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::daily),
            "weekly" => Ok(Frequency::weekly),
            "monthly" => Ok(Frequency::monthly),
            "yearly" => Ok(Frequency::yearly),
            _ => Err(format!(
                "Invalid frequency '{}'. Valid options are: daily, weekly, monthly, yearly",
                s
            )),
        }
    }
}

/// A repeat rule
///
/// Monthly rules pick their day in one of two ways:
/// - `month_day`: the same date each month, clamped to short months
/// - `month_week` + `month_week_day`: "2nd Tuesday", "last Friday" (`month_week = -1`)
///
/// With neither set, a monthly rule keeps the day of the current occurrence,
/// clamped to the target month's length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    pub frequency: Frequency,
    /// Repeat every N units of `frequency`; must be at least 1
    pub interval: i64,
    /// Day of month, 1-31
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_day: Option<u32>,
    /// Week of month: 1-4, or -1 for the last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_week: Option<i32>,
    /// Weekday, 0-6 with Sunday = 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_week_day: Option<u32>,
    /// Last date the series may reach (never beyond one year from start)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceConfig {
    /// A rule with no monthly selectors and no end date
    pub fn new(frequency: Frequency, interval: i64) -> Self {
        Self {
            frequency,
            interval,
            month_day: None,
            month_week: None,
            month_week_day: None,
            end_date: None,
        }
    }

    /// Reject rules the engine cannot expand
    pub fn validate(&self) -> Result<()> {
        if self.interval < 1 {
            return Err(Error::Configuration(format!(
                "interval must be at least 1 (got {})",
                self.interval
            )));
        }
        if let Some(day) = self.month_day
            && !(1..=31).contains(&day)
        {
            return Err(Error::Configuration(format!(
                "month_day must be between 1 and 31 (got {})",
                day
            )));
        }
        if let Some(week) = self.month_week
            && !matches!(week, 1..=4 | -1)
        {
            return Err(Error::Configuration(format!(
                "month_week must be 1, 2, 3, 4 or -1 (got {})",
                week
            )));
        }
        if let Some(weekday) = self.month_week_day
            && weekday > 6
        {
            return Err(Error::Configuration(format!(
                "month_week_day must be between 0 (Sunday) and 6 (Saturday) (got {})",
                weekday
            )));
        }
        if self.month_week.is_some() != self.month_week_day.is_some() {
            return Err(Error::Configuration(
                "month_week and month_week_day must be given together".to_string(),
            ));
        }
        Ok(())
    }

    /// JSON form stored on generated bullets
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Expand a rule into its dates
///
/// The start date is always the first occurrence (if it is not past the end
/// date). Fails with [`Error::Configuration`] for rules rejected by
/// [`RecurrenceConfig::validate`].
pub fn generate_recurring_dates(
    start: NaiveDate,
    config: &RecurrenceConfig,
    limit: usize,
) -> Result<Vec<NaiveDate>> {
    config.validate()?;

    let hard_limit = add_years(start, 1).unwrap_or(NaiveDate::MAX);
    let end = config
        .end_date
        .map_or(hard_limit, |user_end| user_end.min(hard_limit));
    let cap = limit.min(MAX_OCCURRENCES);

    let mut dates = Vec::new();
    let mut current = start;
    while dates.len() < cap {
        if current > end {
            break;
        }
        dates.push(current);

        match next_occurrence(current, config) {
            Some(next) if next > current => current = next,
            // Out of calendar range, or a step that does not advance
            _ => break,
        }
    }

    debug!(
        start = %start,
        frequency = ?config.frequency,
        interval = config.interval,
        count = dates.len(),
        "expanded recurrence"
    );
    Ok(dates)
}

/// String boundary for [`generate_recurring_dates`]: ISO in, ISO out
pub fn generate_recurring_iso_dates(
    start: &str,
    config: &RecurrenceConfig,
    limit: usize,
) -> Result<Vec<String>> {
    let start = dates::parse_iso_date(start)?;
    Ok(generate_recurring_dates(start, config, limit)?
        .into_iter()
        .map(dates::format_iso_date)
        .collect())
}

fn next_occurrence(current: NaiveDate, config: &RecurrenceConfig) -> Option<NaiveDate> {
    let interval = u32::try_from(config.interval).ok()?;
    match config.frequency {
        Frequency::daily => add_days(current, u64::from(interval)),
        Frequency::weekly => add_days(current, u64::from(interval) * 7),
        Frequency::monthly => {
            let base = add_months(current, interval)?;
            match (config.month_week, config.month_week_day, config.month_day) {
                (Some(week), Some(weekday), _) => relative_weekday_in_month(base, week, weekday),
                (_, _, Some(day)) => base.with_day(day.min(dates::days_in_month(base))),
                _ => Some(base),
            }
        }
        Frequency::yearly => add_years(current, interval),
    }
}

/// The `week`-th `weekday` (Sunday = 0) of the month containing `base`;
/// `week = -1` is the last one.
fn relative_weekday_in_month(base: NaiveDate, week: i32, weekday: u32) -> Option<NaiveDate> {
    let month_start = base.with_day(1)?;
    let offset = (7 + weekday - month_start.weekday().num_days_from_sunday()) % 7;
    let first = add_days(month_start, u64::from(offset))?;

    if week == -1 {
        let mut last = first;
        loop {
            match add_days(last, 7) {
                Some(next) if next.month() == first.month() => last = next,
                _ => break,
            }
        }
        Some(last)
    } else {
        let skip = u64::try_from(week - 1).ok()?;
        add_days(first, skip * 7)
    }
}

/// What every bullet of a new series shares
#[derive(Debug, Clone)]
pub struct SeriesTemplate {
    pub content: String,
    pub bullet_type: BulletType,
    pub collection_id: Option<String>,
    pub parent_note_id: Option<String>,
}

/// Expand a rule into ready-to-insert bullets
///
/// Every bullet gets a fresh id, the same `recurring_id`, and the rule's JSON
/// in `recurrence_rule`. `order` increases with the date so the series keeps
/// its sequence within a day's list.
pub fn expand_series(
    template: &SeriesTemplate,
    start: NaiveDate,
    config: &RecurrenceConfig,
    limit: usize,
    clock: &dyn Clock,
) -> Result<Vec<Bullet>> {
    let dates = generate_recurring_dates(start, config, limit)?;
    let rule = config.to_json()?;
    let recurring_id = Uuid::now_v7().to_string();
    let now = clock.now_millis();

    Ok(dates
        .into_iter()
        .enumerate()
        .map(|(index, date)| Bullet {
            id: Uuid::now_v7().to_string(),
            content: template.content.clone(),
            bullet_type: template.bullet_type,
            state: BulletState::open,
            date: Some(date),
            collection_id: template.collection_id.clone(),
            order: now as f64 + index as f64,
            created_at: now,
            updated_at: now,
            completed_at: None,
            long_form_content: None,
            parent_note_id: template.parent_note_id.clone(),
            recurring_id: Some(recurring_id.clone()),
            recurrence_rule: Some(rule.clone()),
        })
        .collect())
}
