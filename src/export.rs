//! Backup export
//!
//! Narrows a journal down to what the user chose to export: excluded
//! projects are removed together with their bullets, and dated bullets are
//! kept only inside the chosen range. Undated bullets always survive the
//! date filter.

use crate::clock::Clock;
use crate::dates;
use crate::error::{Error, Result};
use crate::journal::JournalState;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::info;

/// Which dated bullets to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    /// Every bullet
    #[default]
    All,
    /// Monday through Sunday of the current week
    ThisWeek,
    /// Today and the 29 days before it
    #[serde(rename = "past-30-days")]
    Past30Days,
}

impl DateRange {
    /// Inclusive bounds of the range relative to `today`; `None` for [`DateRange::All`]
    pub fn interval(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            DateRange::All => None,
            DateRange::ThisWeek => Some(dates::week_bounds(today)),
            DateRange::Past30Days => {
                let start = today.checked_sub_days(Days::new(29)).unwrap_or(NaiveDate::MIN);
                Some((start, today))
            }
        }
    }
}

impl FromStr for DateRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(DateRange::All),
            "this-week" => Ok(DateRange::ThisWeek),
            "past-30-days" => Ok(DateRange::Past30Days),
            _ => Err(Error::Configuration(format!(
                "Invalid date range '{}'. Valid options are: all, this-week, past-30-days",
                s
            ))),
        }
    }
}

/// What to export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub date_range: DateRange,
    pub excluded_collection_ids: BTreeSet<String>,
}

/// Reduce `state` to the subset selected by `options`
///
/// View, preferences and format version pass through unchanged. "Today" comes
/// from `clock`.
pub fn filter_for_export(
    state: &JournalState,
    options: &ExportOptions,
    clock: &dyn Clock,
) -> JournalState {
    let excluded = &options.excluded_collection_ids;
    let interval = options.date_range.interval(clock.today());

    let collections = state
        .collections
        .iter()
        .filter(|(id, _)| !excluded.contains(id.as_str()))
        .map(|(id, c)| (id.clone(), c.clone()))
        .collect();

    let bullets = state
        .bullets
        .iter()
        .filter(|(_, bullet)| {
            if bullet
                .own_collection()
                .is_some_and(|project| excluded.contains(project))
            {
                return false;
            }
            match (bullet.date, interval) {
                (None, _) | (_, None) => true,
                (Some(date), Some((start, end))) => start <= date && date <= end,
            }
        })
        .map(|(id, b)| (id.clone(), b.clone()))
        .collect();

    JournalState {
        format_version: state.format_version,
        view: state.view.clone(),
        preferences: state.preferences.clone(),
        bullets,
        collections,
    }
}

/// Backup file contents for a (filtered) journal
pub fn export_to_json(state: &JournalState) -> Result<String> {
    let json = serde_json::to_string_pretty(state)?;
    info!(
        bullets = state.bullets.len(),
        collections = state.collections.len(),
        "exported journal"
    );
    Ok(json)
}
