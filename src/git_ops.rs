//! Git versioning of the journal file
//!
//! When the journal file sits inside a git working tree, each save can be
//! committed and pushed to `origin`, and the latest remote state pulled
//! (fast-forward only) before loading. A repository without an `origin`
//! remote is a local-only journal: saves are committed, nothing is pulled or
//! pushed. Outside a repository every operation is a no-op.

use anyhow::{Context, Result, anyhow};
use git2::{Remote, Repository, Signature, Time};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const FALLBACK_NAME: &str = "bujo-mcp";
const FALLBACK_EMAIL: &str = "bujo-mcp@localhost";

pub struct GitOps {
    repo: Option<Mutex<Repository>>,
}

impl GitOps {
    /// Discover the repository containing `file_path`, if any
    pub fn new(file_path: &Path) -> Self {
        let dir = if file_path.is_dir() {
            file_path
        } else {
            file_path.parent().unwrap_or(file_path)
        };
        let repo = Repository::discover(dir).ok().map(Mutex::new);
        if repo.is_some() {
            debug!(dir = %dir.display(), "journal is under git");
        }
        Self { repo }
    }

    /// Check if the journal file is under git version control
    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    fn lock(&self) -> Option<MutexGuard<'_, Repository>> {
        // A poisoned lock still holds a usable repository handle
        self.repo
            .as_ref()
            .map(|r| r.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    fn origin(repo: &Repository) -> Option<Remote<'_>> {
        repo.find_remote("origin").ok()
    }

    fn current_branch(repo: &Repository) -> Result<String> {
        let head = repo.head().context("Failed to get HEAD")?;
        Ok(head
            .shorthand()
            .context("Failed to get branch name")?
            .to_string())
    }

    /// Fast-forward the current branch from `origin`
    pub fn pull(&self) -> Result<()> {
        let Some(repo) = self.lock() else {
            return Ok(());
        };

        let Some(mut remote) = Self::origin(&repo) else {
            return Ok(());
        };
        let branch = Self::current_branch(&repo)?;
        remote
            .fetch(&[&branch], None, None)
            .context("Failed to fetch from origin")?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let incoming = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&incoming])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }
        if !analysis.is_fast_forward() {
            return Err(anyhow!(
                "Journal history has diverged from origin; merge it manually."
            ));
        }

        let refname = format!("refs/heads/{}", branch);
        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(incoming.id(), "Fast-forward journal")?;
        repo.set_head(&refname)?;
        repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
        info!(branch = %branch, "pulled journal from origin");
        Ok(())
    }

    /// Commit the journal file with `message`
    pub fn commit(&self, file_path: &Path, message: &str) -> Result<()> {
        let Some(repo) = self.lock() else {
            return Ok(());
        };

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        let file_path = file_path
            .canonicalize()
            .unwrap_or_else(|_| file_path.to_path_buf());
        let workdir = workdir
            .canonicalize()
            .unwrap_or_else(|_| workdir.to_path_buf());
        let relative = file_path
            .strip_prefix(&workdir)
            .context("Journal file is not inside the repository")?;

        let mut index = repo.index()?;
        index.add_path(relative)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let parent = match repo.head() {
            Ok(head) => Some(repo.find_commit(head.target().context("HEAD has no target")?)?),
            // Unborn branch: this is the first commit
            Err(_) => None,
        };
        let parents: Vec<_> = parent.iter().collect();
        let signature = Self::signature(&repo)?;

        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        debug!(message, "committed journal");
        Ok(())
    }

    /// Push the current branch to `origin`
    pub fn push(&self) -> Result<()> {
        let Some(repo) = self.lock() else {
            return Ok(());
        };

        let Some(mut remote) = Self::origin(&repo) else {
            return Ok(());
        };
        let branch = Self::current_branch(&repo)?;
        remote.push(&[&format!("refs/heads/{}", branch)], None)?;
        Ok(())
    }

    /// Configured identity, or a fixed fallback for unconfigured machines
    fn signature(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| FALLBACK_NAME.to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| FALLBACK_EMAIL.to_string());

        match Signature::now(&name, &email) {
            Ok(sig) => Ok(sig),
            Err(_) => Signature::new(&name, &email, &Time::new(1_700_000_000, 0))
                .context("Failed to create commit signature"),
        }
    }

    /// Pull, commit, push (pull and push only when `origin` exists)
    pub fn sync(&self, file_path: &Path, message: &str) -> Result<()> {
        if !self.is_git_managed() {
            return Ok(());
        }
        self.pull().context("Failed to pull changes")?;
        self.commit(file_path, message)
            .context("Failed to commit changes")?;
        self.push().context("Failed to push changes")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        (dir, repo)
    }

    #[test]
    fn test_outside_repository_is_noop() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("journal.toml");
        fs::write(&file, "format_version = 1").unwrap();

        let git = GitOps::new(&file);
        assert!(!git.is_git_managed());
        assert!(git.sync(&file, "noop").is_ok());
    }

    #[test]
    fn test_first_commit_on_unborn_branch() {
        let (dir, repo) = init_repo();
        let file = dir.path().join("journal.toml");
        fs::write(&file, "format_version = 1").unwrap();

        let git = GitOps::new(&file);
        assert!(git.is_git_managed());
        git.commit(&file, "Add bullet call-mom").unwrap();

        let head = repo.head().unwrap();
        let commit = repo.find_commit(head.target().unwrap()).unwrap();
        assert_eq!(commit.message().unwrap(), "Add bullet call-mom");
        assert_eq!(commit.parent_count(), 0);
    }

    #[test]
    fn test_sync_without_origin_commits_locally() {
        let (dir, repo) = init_repo();
        let file = dir.path().join("journal.toml");
        let git = GitOps::new(&file);

        fs::write(&file, "format_version = 1").unwrap();
        git.sync(&file, "Add collection work").unwrap();
        fs::write(&file, "format_version = 1\n\n[preferences]\n").unwrap();
        git.sync(&file, "Toggle sort_by_type").unwrap();

        let head = repo.head().unwrap();
        let commit = repo.find_commit(head.target().unwrap()).unwrap();
        assert_eq!(commit.message().unwrap(), "Toggle sort_by_type");
        assert_eq!(commit.parent(0).unwrap().message().unwrap(), "Add collection work");
    }
}
