use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of a logged item
///
/// Only affects presentation; the core logic treats all kinds alike.
/// Uses snake_case naming to match TOML serialization format.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletType {
    /// Something to do
    task,
    /// Information to remember
    note,
    /// Something that happens on a date
    event,
}

/// Lifecycle state of a bullet
///
/// `migrated` is terminal for a row: migrating forwards a copy into a new row
/// (except for project-owned bullets, which are moved in place).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletState {
    /// Not yet done
    open,
    /// Done
    completed,
    /// Forwarded to another date
    migrated,
    /// Moved to the future log
    scheduled,
    /// Dropped
    cancelled,
}

impl BulletState {
    /// Whether the bullet is finished in some way (hidden when completed items are hidden)
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            BulletState::completed | BulletState::migrated | BulletState::cancelled
        )
    }
}

impl FromStr for BulletType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(BulletType::task),
            "note" => Ok(BulletType::note),
            "event" => Ok(BulletType::event),
            _ => Err(format!(
                "Invalid bullet type '{}'. Valid options are: task, note, event",
                s
            )),
        }
    }
}

impl FromStr for BulletState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(BulletState::open),
            "completed" => Ok(BulletState::completed),
            "migrated" => Ok(BulletState::migrated),
            "scheduled" => Ok(BulletState::scheduled),
            "cancelled" => Ok(BulletState::cancelled),
            _ => Err(format!(
                "Invalid state '{}'. Valid options are: open, completed, migrated, scheduled, cancelled",
                s
            )),
        }
    }
}

/// One logged item in the journal
///
/// Bullets live in a flat map keyed by id. Relationships (`collection_id`,
/// `parent_note_id`) are ids resolved by lookup, never embedded references,
/// so a missing target is simply a dangling id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bullet {
    /// Unique identifier, stable for the item's lifetime
    pub id: String,
    /// User-facing text
    pub content: String,
    /// task, note or event
    #[serde(rename = "type")]
    pub bullet_type: BulletType,
    /// Current lifecycle state
    pub state: BulletState,
    /// Day the bullet is logged against (format: YYYY-MM-DD); undated when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Owning project/list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    /// Opaque sort key
    pub order: f64,
    /// Creation time, epoch millis
    pub created_at: i64,
    /// Last update time, epoch millis
    pub updated_at: i64,
    /// Completion time, epoch millis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    /// Rich note body (JSON document, may embed tasks by bullet id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_form_content: Option<String>,
    /// Note that contains this bullet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_note_id: Option<String>,
    /// Shared by all bullets generated from one recurrence expansion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<String>,
    /// JSON of the rule that generated this bullet (display only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<String>,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            id: String::new(),
            content: String::new(),
            bullet_type: BulletType::task,
            state: BulletState::open,
            date: None,
            collection_id: None,
            order: 0.0,
            created_at: 0,
            updated_at: 0,
            completed_at: None,
            long_form_content: None,
            parent_note_id: None,
            recurring_id: None,
            recurrence_rule: None,
        }
    }
}

impl Bullet {
    /// Own project assignment, treating an empty string as unassigned
    pub fn own_collection(&self) -> Option<&str> {
        self.collection_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Parent note id, treating an empty string as no parent
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_note_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Check if this bullet belongs to a recurring series
    pub fn is_recurring(&self) -> bool {
        self.recurring_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_id_is_unassigned() {
        let bullet = Bullet {
            collection_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(bullet.own_collection(), None);
    }

    #[test]
    fn test_closed_states() {
        assert!(BulletState::completed.is_closed());
        assert!(BulletState::migrated.is_closed());
        assert!(BulletState::cancelled.is_closed());
        assert!(!BulletState::open.is_closed());
        assert!(!BulletState::scheduled.is_closed());
    }

    #[test]
    fn test_parse_state() {
        assert_eq!(
            "completed".parse::<BulletState>().unwrap(),
            BulletState::completed
        );
        assert!("done".parse::<BulletState>().is_err());
    }
}
