//! TOML file persistence for the journal, with optional git sync

use crate::git_ops::GitOps;
use crate::journal::JournalState;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct Storage {
    file_path: PathBuf,
    sync_git: bool,
    git_ops: GitOps,
}

impl Storage {
    /// Create storage for `file_path`; with `sync_git`, every save is
    /// committed and pushed when the file lives in a git repository.
    pub fn new(file_path: impl AsRef<Path>, sync_git: bool) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let git_ops = GitOps::new(&file_path);
        Self {
            file_path,
            sync_git,
            git_ops,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the journal; a missing or empty file is an empty journal
    pub fn load(&self) -> Result<JournalState> {
        if self.sync_git
            && let Err(e) = self.git_ops.pull()
        {
            warn!(error = %e, "git pull before load failed");
        }

        if !self.file_path.exists() {
            info!(path = %self.file_path.display(), "no journal file yet, starting empty");
            return Ok(JournalState::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        if content.trim().is_empty() {
            return Ok(JournalState::new());
        }
        let data: JournalState = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        info!(
            path = %self.file_path.display(),
            bullets = data.bullets.len(),
            collections = data.collections.len(),
            "loaded journal"
        );
        Ok(data)
    }

    /// Save with a default commit message
    pub fn save(&self, data: &JournalState) -> Result<()> {
        self.save_with_message(data, "Update journal")
    }

    /// Save and, when git sync is on, commit with `message` and push
    pub fn save_with_message(&self, data: &JournalState, message: &str) -> Result<()> {
        let content = toml::to_string_pretty(data).context("Failed to serialize journal")?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;

        if self.sync_git
            && let Err(e) = self.git_ops.sync(&self.file_path, message)
        {
            // The file is saved; a failed sync is retried with the next save
            warn!(error = %e, "git sync failed");
        }
        Ok(())
    }

    /// Final push on shutdown
    pub fn shutdown(&self) -> Result<()> {
        if self.sync_git {
            self.git_ops.push()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{Bullet, BulletType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("journal.toml"), false);
        assert_eq!(storage.load().unwrap().bullet_count(), 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("journal.toml"), false);

        let mut data = JournalState::new();
        data.bullets.insert(
            "call-mom".to_string(),
            Bullet {
                id: "call-mom".to_string(),
                content: "Call mom".to_string(),
                bullet_type: BulletType::task,
                date: NaiveDate::from_ymd_opt(2025, 5, 11),
                order: 1.5,
                parent_note_id: Some("sunday-note".to_string()),
                ..Default::default()
            },
        );
        storage.save(&data).unwrap();

        let content = fs::read_to_string(storage.file_path()).unwrap();
        assert!(content.contains("[bullets.call-mom]"));
        assert!(content.contains("date = \"2025-05-11\""));

        assert_eq!(storage.load().unwrap(), data);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.toml");
        fs::write(&path, "bullets = [not toml").unwrap();
        assert!(Storage::new(&path, false).load().is_err());
    }
}
