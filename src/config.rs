//! Server configuration
//!
//! Collected from the command line (see `main.rs`) and handed to
//! [`crate::BujoServerHandler::with_config`].

use crate::recurrence;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the journal TOML file
    pub file: PathBuf,
    /// Commit and push every save when the file is in a git repository
    pub sync_git: bool,
    /// `tracing` filter directive; `None` defers to `BUJO_LOG`
    pub log_filter: Option<String>,
    /// Maximum bullets created by one `add_recurring` call
    pub recurrence_limit: usize,
}

impl ServerConfig {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            sync_git: false,
            log_filter: None,
            recurrence_limit: recurrence::DEFAULT_LIMIT,
        }
    }

    /// Recurrence limit clamped to what the engine will ever produce
    pub fn effective_recurrence_limit(&self) -> usize {
        self.recurrence_limit.min(recurrence::MAX_OCCURRENCES)
    }
}
