//! Bullet Journal MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for a bullet
//! journal: tasks, notes and events logged against days or projects,
//! migrated forward when unfinished, nested under notes, and expanded from
//! recurrence rules. The journal is a TOML file, optionally versioned in git.
//!
//! # Architecture
//!
//! - **MCP Layer**: `BujoServerHandler` and `handlers` - tool arguments in, text out
//! - **Domain Layer**: `journal`, `recurrence`, `hierarchy`, `export`, `reducer`
//! - **Persistence Layer**: `storage` and `git_ops` - TOML file with git sync
//!
//! # Example
//!
//! ```no_run
//! use bujo_mcp::BujoServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = BujoServerHandler::new("journal.toml", false)?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod formatting;
mod git_ops;
pub mod handlers;
pub mod hierarchy;
pub mod journal;
pub mod logging;
pub mod note_content;
pub mod recurrence;
pub mod reducer;
pub mod storage;
pub mod validation;

use anyhow::Result;
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ServerConfig;
pub use error::Error;
pub use journal::{Bullet, BulletState, BulletType, Collection, CollectionType, JournalState};
pub use storage::Storage;

/// MCP Server handler for the bullet journal
///
/// Holds the journal in memory behind a mutex. Every tool call applies one
/// reducer command under the lock, then saves the file (and syncs git when
/// enabled) after releasing it.
pub struct BujoServerHandler {
    pub(crate) data: Mutex<JournalState>,
    pub(crate) storage: Storage,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) recurrence_limit: usize,
}

impl BujoServerHandler {
    /// Create a new handler
    ///
    /// # Arguments
    /// * `storage_path` - Path to the journal file (TOML format)
    /// * `sync_git` - Enable automatic Git synchronization
    pub fn new(storage_path: impl AsRef<Path>, sync_git: bool) -> Result<Self> {
        let mut config = ServerConfig::new(storage_path.as_ref());
        config.sync_git = sync_git;
        Self::with_config(&config)
    }

    /// Create a handler from parsed server configuration
    pub fn with_config(config: &ServerConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a handler with an explicit clock (tests pin "today" this way)
    pub fn with_clock(config: &ServerConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let storage = Storage::new(&config.file, config.sync_git);
        let data = Mutex::new(storage.load()?);
        Ok(Self {
            data,
            storage,
            clock,
            recurrence_limit: config.effective_recurrence_limit(),
        })
    }

    /// Lock the journal; a poisoned lock still guards consistent data
    /// because commands are applied whole.
    pub(crate) fn lock_data(&self) -> MutexGuard<'_, JournalState> {
        self.data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply a reducer command to the locked journal
    pub(crate) fn apply_locked(&self, data: &mut JournalState, command: reducer::Command) {
        let current = std::mem::take(data);
        *data = reducer::apply(current, command, self.clock.as_ref());
    }

    /// Save the journal with a custom commit message
    pub(crate) fn save_data_with_message(&self, message: &str) -> Result<()> {
        let data = self.lock_data();
        self.storage.save_with_message(&data, message)?;
        Ok(())
    }

    /// Snapshot of the current journal
    pub fn snapshot(&self) -> JournalState {
        self.lock_data().clone()
    }
}

impl Drop for BujoServerHandler {
    fn drop(&mut self) {
        // Push to git on shutdown if sync is enabled
        if let Err(e) = self.storage.shutdown() {
            warn!(error = %e, "shutdown git sync failed");
        }
    }
}

/// Bullet journal server for rapid logging.
///
/// Bullets are short entries of three kinds: **task** (•), **note** (-) and
/// **event** (o). Each is logged on a day (YYYY-MM-DD) or left undated, and
/// may belong to a **collection** (a project, list or future log).
///
/// Key concepts:
/// - **state**: open, completed, migrated, scheduled, cancelled
/// - **migration**: moving an unfinished bullet to another day
/// - **nesting**: bullets can sit under a note via parent_note_id; they
///   inherit the note's project unless they name their own
/// - **recurrence**: daily, weekly, monthly (by date or "2nd Tuesday"/"last Friday") or yearly,
///   expanded at most one year ahead
///
/// IDs are arbitrary strings chosen by the client (e.g. "call-mom", "q3-plan").
#[mcp_server]
impl McpServer for BujoServerHandler {
    /// **Log**: Add a task, note or event. Start here for anything worth writing down.
    /// **Tip**: Leave date empty for an undated (backlog) bullet. Nest under a note with parent_note_id.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn add_bullet(
        &self,
        /// ID: any unique string (e.g., "call-mom", "standup-0312")
        id: String,
        /// Short text of the bullet
        content: String,
        /// task (default), note or event
        bullet_type: Option<String>,
        /// Day YYYY-MM-DD; omit for undated
        date: Option<String>,
        /// Collection (project) ID
        collection_id: Option<String>,
        /// ID of the note this bullet is nested under
        parent_note_id: Option<String>,
        /// Rich note body (JSON document)
        long_form_content: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_bullet(
            id,
            content,
            bullet_type,
            date,
            collection_id,
            parent_note_id,
            long_form_content,
        )
        .await
    }

    /// **Organize**: Create a collection to group bullets (a project, list or future log).
    #[tool]
    async fn add_collection(
        &self,
        /// ID: any unique string (e.g., "website-redesign")
        id: String,
        /// Display title
        title: String,
        /// project (default), list or future_log
        collection_type: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_collection(id, title, collection_type).await
    }

    /// **Review**: List bullets. No filter = everything (completed ones hidden if show_completed is off).
    /// **Use**: date="2025-03-14" for a daily log, collection_id for a project (includes bullets nested under its notes).
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn list(
        &self,
        /// Only this day (YYYY-MM-DD)
        date: Option<String>,
        /// open/completed/migrated/scheduled/cancelled
        state: Option<String>,
        /// task/note/event
        bullet_type: Option<String>,
        /// Case-insensitive text search
        keyword: Option<String>,
        /// Effective project ID
        collection_id: Option<String>,
        /// true = only undated bullets
        undated: Option<bool>,
        /// true = omit note bodies
        exclude_content: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list(
            date,
            state,
            bullet_type,
            keyword,
            collection_id,
            undated,
            exclude_content,
        )
        .await
    }

    /// **Review**: List collections with bullet counts.
    #[tool]
    async fn list_collections(
        &self,
        /// true = include archived collections
        include_archived: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list_collections(include_archived).await
    }

    /// **Edit**: Update bullet details. Use ""(empty string) to clear date, collection_id, parent_note_id or long_form_content.
    /// **Note**: IDs are immutable.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn update_bullet(
        &self,
        /// ID of bullet to update
        id: String,
        /// New text
        content: Option<String>,
        /// task/note/event
        bullet_type: Option<String>,
        /// Day YYYY-MM-DD, "" to make undated
        date: Option<String>,
        /// Collection ID, "" to unassign
        collection_id: Option<String>,
        /// Parent note ID, "" to un-nest
        parent_note_id: Option<String>,
        /// Rich note body, "" to clear
        long_form_content: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_bullet(
            id,
            content,
            bullet_type,
            date,
            collection_id,
            parent_note_id,
            long_form_content,
        )
        .await
    }

    /// **Do**: Mark bullets completed, cancelled, scheduled or open again. Supports multiple IDs.
    /// Migrated bullets are final and are reported as failures.
    #[tool]
    async fn set_state(
        &self,
        /// Bullet IDs
        ids: Vec<String>,
        /// open/completed/scheduled/cancelled (use migrate for migrated)
        state: String,
    ) -> McpResult<String> {
        self.handle_set_state(ids, state).await
    }

    /// **Migrate**: Carry an unfinished bullet to another day.
    /// Project bullets are re-dated in place; others are marked migrated (>) and re-logged with a new ID.
    #[tool]
    async fn migrate(
        &self,
        /// Bullet ID
        id: String,
        /// Target day YYYY-MM-DD
        target_date: String,
    ) -> McpResult<String> {
        self.handle_migrate(id, target_date).await
    }

    /// **Repeat**: Create a series of bullets from a recurrence rule, at most one year ahead.
    /// **Monthly**: month_day=15 for "the 15th"; month_week=2 + month_week_day=2 for "2nd Tuesday"; month_week=-1 for "last".
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn add_recurring(
        &self,
        /// Short text of each bullet
        content: String,
        /// First occurrence YYYY-MM-DD
        start_date: String,
        /// daily/weekly/monthly/yearly
        frequency: String,
        /// Every N units (default 1)
        interval: Option<i64>,
        /// Day of month 1-31 (monthly)
        month_day: Option<u32>,
        /// Week of month 1-4, -1 = last (monthly)
        month_week: Option<i32>,
        /// Weekday 0-6, Sunday = 0 (monthly, with month_week)
        month_week_day: Option<u32>,
        /// Last possible day YYYY-MM-DD
        end_date: Option<String>,
        /// task (default), note or event
        bullet_type: Option<String>,
        /// Collection (project) ID
        collection_id: Option<String>,
        /// ID of the note to nest the series under
        parent_note_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_recurring(
            content,
            start_date,
            frequency,
            interval,
            month_day,
            month_week,
            month_week_day,
            end_date,
            bullet_type,
            collection_id,
            parent_note_id,
        )
        .await
    }

    /// **Delete**: Permanently remove a bullet. Notes with nested bullets must be emptied first.
    #[tool]
    async fn delete_bullet(
        &self,
        /// Bullet ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_bullet(id).await
    }

    /// **Organize**: Put bullets in the given order, e.g. a day's tasks by priority.
    /// The listed bullets swap their positions; other bullets stay where they are.
    #[tool]
    async fn reorder_bullets(
        &self,
        /// Bullet IDs, first to last
        ids: Vec<String>,
    ) -> McpResult<String> {
        self.handle_reorder_bullets(ids).await
    }

    /// **Organize**: Rename, retype, reorder or archive a collection.
    #[tool]
    async fn update_collection(
        &self,
        /// Collection ID
        id: String,
        /// New title
        title: Option<String>,
        /// project/list/future_log
        collection_type: Option<String>,
        /// Sort key
        order: Option<f64>,
        /// true = archive, false = restore
        archived: Option<bool>,
    ) -> McpResult<String> {
        self.handle_update_collection(id, title, collection_type, order, archived)
            .await
    }

    /// **Delete**: Permanently remove an empty collection. Archive collections that still have bullets.
    #[tool]
    async fn delete_collection(
        &self,
        /// Collection ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_collection(id).await
    }

    /// **Settings**: Choose which log the journal opens on.
    #[tool]
    async fn set_view(
        &self,
        /// daily/week/future/collection/search/backlog
        mode: String,
        /// Day to show YYYY-MM-DD (keeps the current day when omitted)
        date: Option<String>,
        /// Collection ID (required for collection mode)
        collection_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_set_view(mode, date, collection_id).await
    }

    /// **Settings**: Toggle group_by_project, show_completed or sort_by_type.
    #[tool]
    async fn toggle_preference(
        &self,
        /// group_by_project/show_completed/sort_by_type
        key: String,
    ) -> McpResult<String> {
        self.handle_toggle_preference(key).await
    }

    /// **Backup**: Export the journal as JSON, filtered by date range and excluded projects.
    /// **Note**: Undated bullets are always kept unless their project is excluded.
    #[tool]
    async fn export(
        &self,
        /// all (default), this-week or past-30-days
        date_range: Option<String>,
        /// Collection IDs to leave out, with their bullets
        exclude_collections: Option<Vec<String>>,
        /// File to write; omit to return the JSON
        path: Option<String>,
    ) -> McpResult<String> {
        self.handle_export(date_range, exclude_collections, path)
            .await
    }
}
