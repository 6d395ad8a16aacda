//! Journal mutations
//!
//! All changes to a [`JournalState`] go through [`apply`]: one command in,
//! the next state out. The server holds the only writable state and applies
//! commands one at a time under its lock. Commands that name a missing
//! bullet or collection leave the state unchanged.

use crate::clock::Clock;
use crate::journal::{
    Bullet, BulletState, BulletType, Collection, CollectionType, JournalState, PreferenceKey,
    ViewMode, ViewState,
};
use crate::note_content;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Fields for a newly logged bullet
#[derive(Debug, Clone)]
pub struct NewBullet {
    pub id: String,
    pub content: String,
    pub bullet_type: BulletType,
    pub date: Option<NaiveDate>,
    pub collection_id: Option<String>,
    pub parent_note_id: Option<String>,
    pub long_form_content: Option<String>,
}

/// Partial update of a bullet
///
/// `None` leaves a field alone. For optional fields, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct BulletPatch {
    pub content: Option<String>,
    pub bullet_type: Option<BulletType>,
    pub state: Option<BulletState>,
    pub date: Option<Option<NaiveDate>>,
    pub collection_id: Option<Option<String>>,
    pub parent_note_id: Option<Option<String>>,
    pub long_form_content: Option<Option<String>>,
}

/// Fields for a new collection
#[derive(Debug, Clone)]
pub struct NewCollection {
    pub id: String,
    pub title: String,
    pub collection_type: CollectionType,
}

/// Partial update of a collection; ordering goes through [`Command::ReorderCollections`]
#[derive(Debug, Clone, Default)]
pub struct CollectionPatch {
    pub title: Option<String>,
    pub collection_type: Option<CollectionType>,
    pub archived: Option<bool>,
}

/// A requested change of view; a missing date keeps the current one
#[derive(Debug, Clone)]
pub struct ViewChange {
    pub mode: ViewMode,
    pub date: Option<NaiveDate>,
    pub collection_id: Option<String>,
}

/// A single mutation of the journal
#[derive(Debug, Clone)]
pub enum Command {
    AddBullet(NewBullet),
    /// Insert prepared bullets as-is (a recurrence batch)
    AddBullets(Vec<Bullet>),
    UpdateBullet {
        id: String,
        patch: BulletPatch,
    },
    UpdateBullets {
        ids: Vec<String>,
        patch: BulletPatch,
    },
    /// New sort keys, by id
    ReorderBullets(Vec<(String, f64)>),
    ReorderCollections(Vec<(String, f64)>),
    DeleteBullet(String),
    /// Forward a bullet to `target_date`
    MigrateBullet {
        id: String,
        target_date: NaiveDate,
        new_id: String,
    },
    SetView(ViewChange),
    AddCollection(NewCollection),
    UpdateCollection {
        id: String,
        patch: CollectionPatch,
    },
    DeleteCollection(String),
    TogglePreference(PreferenceKey),
}

/// Apply one command and return the resulting state
pub fn apply(mut state: JournalState, command: Command, clock: &dyn Clock) -> JournalState {
    let now = clock.now_millis();
    debug!(command = ?command_name(&command), "applying command");

    match command {
        Command::AddBullet(new) => {
            let bullet = Bullet {
                id: new.id.clone(),
                content: new.content,
                bullet_type: new.bullet_type,
                state: BulletState::open,
                date: new.date,
                collection_id: new.collection_id,
                order: now as f64,
                created_at: now,
                updated_at: now,
                completed_at: None,
                long_form_content: new.long_form_content,
                parent_note_id: new.parent_note_id,
                recurring_id: None,
                recurrence_rule: None,
            };
            state.bullets.insert(new.id, bullet);
        }
        Command::AddBullets(bullets) => {
            for bullet in bullets {
                state.bullets.insert(bullet.id.clone(), bullet);
            }
        }
        Command::UpdateBullet { id, patch } => {
            if let Some(bullet) = state.bullets.get_mut(&id) {
                apply_bullet_patch(bullet, &patch, now);
            }
        }
        Command::UpdateBullets { ids, patch } => {
            for id in ids {
                if let Some(bullet) = state.bullets.get_mut(&id) {
                    apply_bullet_patch(bullet, &patch, now);
                }
            }
        }
        Command::ReorderBullets(items) => {
            for (id, order) in items {
                if let Some(bullet) = state.bullets.get_mut(&id) {
                    bullet.order = order;
                }
            }
        }
        Command::ReorderCollections(items) => {
            for (id, order) in items {
                if let Some(collection) = state.collections.get_mut(&id) {
                    collection.order = Some(order);
                }
            }
        }
        Command::DeleteBullet(id) => {
            state.bullets.remove(&id);
        }
        Command::MigrateBullet {
            id,
            target_date,
            new_id,
        } => migrate_bullet(&mut state, &id, target_date, new_id, now),
        Command::SetView(change) => {
            state.view = ViewState {
                mode: change.mode,
                date: change.date.unwrap_or(state.view.date),
                collection_id: change.collection_id,
            };
        }
        Command::AddCollection(new) => {
            let collection = Collection {
                id: new.id.clone(),
                title: new.title,
                collection_type: new.collection_type,
                created_at: now,
                order: Some(now as f64),
                archived: false,
            };
            state.collections.insert(new.id, collection);
        }
        Command::UpdateCollection { id, patch } => {
            if let Some(collection) = state.collections.get_mut(&id) {
                if let Some(title) = patch.title {
                    collection.title = title;
                }
                if let Some(collection_type) = patch.collection_type {
                    collection.collection_type = collection_type;
                }
                if let Some(archived) = patch.archived {
                    collection.archived = archived;
                }
            }
        }
        Command::DeleteCollection(id) => {
            state.collections.remove(&id);
        }
        Command::TogglePreference(key) => state.preferences.toggle(key),
    }
    state
}

/// Sort keys that put `ids` in the given sequence
///
/// The bullets trade their existing sort keys among themselves, so bullets
/// outside `ids` keep their place around them. Ties are pulled apart one
/// unit at a time. Unknown ids are skipped.
pub fn order_slots(ids: &[String], bullets: &BTreeMap<String, Bullet>) -> Vec<(String, f64)> {
    let known: Vec<&String> = ids.iter().filter(|id| bullets.contains_key(*id)).collect();
    let mut slots: Vec<f64> = known.iter().map(|id| bullets[*id].order).collect();
    slots.sort_by(f64::total_cmp);
    for i in 1..slots.len() {
        if slots[i] <= slots[i - 1] {
            slots[i] = slots[i - 1] + 1.0;
        }
    }
    known.into_iter().cloned().zip(slots).collect()
}

fn apply_bullet_patch(bullet: &mut Bullet, patch: &BulletPatch, now: i64) {
    if let Some(ref content) = patch.content {
        bullet.content = content.clone();
    }
    if let Some(bullet_type) = patch.bullet_type {
        bullet.bullet_type = bullet_type;
    }
    if let Some(new_state) = patch.state {
        if new_state == BulletState::completed && bullet.state != BulletState::completed {
            bullet.completed_at = Some(now);
        } else if new_state == BulletState::open && bullet.state == BulletState::completed {
            bullet.completed_at = None;
        }
        bullet.state = new_state;
    }
    if let Some(date) = patch.date {
        bullet.date = date;
    }
    if let Some(ref collection_id) = patch.collection_id {
        bullet.collection_id = collection_id.clone();
    }
    if let Some(ref parent_note_id) = patch.parent_note_id {
        bullet.parent_note_id = parent_note_id.clone();
    }
    if let Some(ref long_form_content) = patch.long_form_content {
        bullet.long_form_content = long_form_content.clone();
    }
    bullet.updated_at = now;
}

/// Project-owned bullets move in place. Anything else is closed as
/// `migrated` and re-logged as a fresh open copy under `new_id`; a parent
/// note embedding the old row is repointed at the copy.
fn migrate_bullet(
    state: &mut JournalState,
    id: &str,
    target_date: NaiveDate,
    new_id: String,
    now: i64,
) {
    let Some(bullet) = state.bullets.get_mut(id) else {
        return;
    };

    if bullet.own_collection().is_some() {
        bullet.date = Some(target_date);
        bullet.updated_at = now;
        return;
    }

    bullet.state = BulletState::migrated;
    bullet.updated_at = now;

    let copy = Bullet {
        id: new_id.clone(),
        date: Some(target_date),
        state: BulletState::open,
        created_at: now,
        updated_at: now,
        order: now as f64,
        completed_at: None,
        ..bullet.clone()
    };
    let parent_id = copy.parent_note_id.clone();
    state.bullets.insert(new_id.clone(), copy);

    if let Some(parent) = parent_id.and_then(|pid| state.bullets.get_mut(&pid))
        && let Some(ref content) = parent.long_form_content
        && note_content::references_bullet(content, id)
    {
        parent.long_form_content =
            Some(note_content::replace_bullet_reference(content, id, &new_id));
        parent.updated_at = now;
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::AddBullet(_) => "add_bullet",
        Command::AddBullets(_) => "add_bullets",
        Command::UpdateBullet { .. } => "update_bullet",
        Command::UpdateBullets { .. } => "update_bullets",
        Command::ReorderBullets(_) => "reorder_bullets",
        Command::ReorderCollections(_) => "reorder_collections",
        Command::DeleteBullet(_) => "delete_bullet",
        Command::MigrateBullet { .. } => "migrate_bullet",
        Command::SetView(_) => "set_view",
        Command::AddCollection(_) => "add_collection",
        Command::UpdateCollection { .. } => "update_collection",
        Command::DeleteCollection(_) => "delete_collection",
        Command::TogglePreference(_) => "toggle_preference",
    }
}
