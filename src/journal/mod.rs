//! Bullet journal domain models
//!
//! This module contains the core journal data structures:
//! - `bullet`: Logged items (tasks, notes, events)
//! - `collection`: Projects and lists
//! - `journal_data`: The journal container with view and preferences
//! - `queries`: Read-only lookups over the journal

mod bullet;
mod collection;
mod journal_data;
mod queries;

pub use bullet::{Bullet, BulletState, BulletType};
pub use collection::{Collection, CollectionType};
pub use journal_data::{
    FORMAT_VERSION, JournalState, PreferenceKey, Preferences, ViewMode, ViewState,
};
pub use queries::BulletQuery;
