use crate::clock::local_date_today;
use crate::journal::bullet::Bullet;
use crate::journal::collection::Collection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Which log the client is looking at
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    daily,
    week,
    future,
    collection,
    search,
    backlog,
}

/// The client's current view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub mode: ViewMode,
    /// Day shown by the daily log
    pub date: NaiveDate,
    /// Collection shown in collection mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

impl ViewState {
    /// Daily log of `date`
    pub fn daily(date: NaiveDate) -> Self {
        Self {
            mode: ViewMode::daily,
            date,
            collection_id: None,
        }
    }
}

// Daily log of 1970-01-01; `Default` never reads the clock
impl Default for ViewState {
    fn default() -> Self {
        Self::daily(NaiveDate::default())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(ViewMode::daily),
            "week" => Ok(ViewMode::week),
            "future" => Ok(ViewMode::future),
            "collection" => Ok(ViewMode::collection),
            "search" => Ok(ViewMode::search),
            "backlog" => Ok(ViewMode::backlog),
            _ => Err(format!(
                "Invalid view mode '{}'. Valid options are: daily, week, future, collection, search, backlog",
                s
            )),
        }
    }
}

/// Display preferences, persisted with the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub group_by_project: bool,
    pub show_completed: bool,
    pub sort_by_type: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            group_by_project: false,
            show_completed: true,
            sort_by_type: false,
        }
    }
}

/// Name of a boolean preference
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    group_by_project,
    show_completed,
    sort_by_type,
}

impl FromStr for PreferenceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group_by_project" => Ok(PreferenceKey::group_by_project),
            "show_completed" => Ok(PreferenceKey::show_completed),
            "sort_by_type" => Ok(PreferenceKey::sort_by_type),
            _ => Err(format!(
                "Invalid preference '{}'. Valid options are: group_by_project, show_completed, sort_by_type",
                s
            )),
        }
    }
}

impl Preferences {
    /// Flip one preference
    pub fn toggle(&mut self, key: PreferenceKey) {
        let flag = match key {
            PreferenceKey::group_by_project => &mut self.group_by_project,
            PreferenceKey::show_completed => &mut self.show_completed,
            PreferenceKey::sort_by_type => &mut self.sort_by_type,
        };
        *flag = !*flag;
    }
}

/// The whole journal: every bullet and collection plus view and preferences
///
/// Bullets and collections are kept in `BTreeMap`s keyed by id. The ordered
/// map gives stable TOML output, which keeps git diffs of the journal file
/// small when a single bullet changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalState {
    /// Format version for the TOML file
    pub format_version: u32,
    pub view: ViewState,
    pub preferences: Preferences,
    pub bullets: BTreeMap<String, Bullet>,
    pub collections: BTreeMap<String, Collection>,
}

impl Default for JournalState {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            view: ViewState::default(),
            preferences: Preferences::default(),
            bullets: BTreeMap::new(),
            collections: BTreeMap::new(),
        }
    }
}

impl JournalState {
    /// Create a new empty journal showing today's daily log
    pub fn new() -> Self {
        Self {
            view: ViewState::daily(local_date_today()),
            ..Self::default()
        }
    }

    /// Check whether an id is used by any bullet or collection
    pub fn contains_id(&self, id: &str) -> bool {
        self.bullets.contains_key(id) || self.collections.contains_key(id)
    }

    /// Find a bullet by its ID
    pub fn find_bullet(&self, id: &str) -> Option<&Bullet> {
        self.bullets.get(id)
    }

    /// Find a collection by its ID
    pub fn find_collection(&self, id: &str) -> Option<&Collection> {
        self.collections.get(id)
    }

    /// Count total number of bullets
    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_preference() {
        let mut prefs = Preferences::default();
        prefs.toggle(PreferenceKey::show_completed);
        assert!(!prefs.show_completed);
        prefs.toggle(PreferenceKey::show_completed);
        assert!(prefs.show_completed);
    }

    #[test]
    fn test_default_view_does_not_depend_on_today() {
        assert_eq!(JournalState::default().view, JournalState::default().view);
        assert_eq!(ViewState::default().date, NaiveDate::default());
        assert_ne!(JournalState::new().view.date, NaiveDate::default());
    }

    #[test]
    fn test_parse_view_mode() {
        assert_eq!("week".parse::<ViewMode>().unwrap(), ViewMode::week);
        assert!("month".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_new_journal_is_empty() {
        let state = JournalState::new();
        assert_eq!(state.format_version, FORMAT_VERSION);
        assert_eq!(state.bullet_count(), 0);
        assert!(state.collections.is_empty());
        assert!(!state.contains_id("anything"));
    }
}
