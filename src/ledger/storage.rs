//! JSON ledger stored in the staging checkout and committed with git.

use crate::error::{Error, Result};
use crate::ledger::CommitLedger;
use crate::process::run_quiet;
use crate::types::Commit;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default ledger filename at the repository root.
pub const LEDGER_FILE: &str = ".pick_status.json";

/// Ledger backed by a pretty-printed JSON array.
pub struct JsonLedger {
    repo_root: PathBuf,
    path: PathBuf,
}

impl JsonLedger {
    /// Ledger at `repo_root/file`.
    pub fn new(repo_root: impl Into<PathBuf>, file: impl AsRef<Path>) -> Self {
        let repo_root = repo_root.into();
        let path = repo_root.join(file);
        Self { repo_root, path }
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path.file_name().map_or_else(
            || LEDGER_FILE.to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

/// Arguments for the `git commit` that records a ledger change.
pub(crate) fn commit_args(file_name: &str, message: &str, amend: bool) -> Vec<String> {
    if amend {
        vec!["commit".into(), "--amend".into(), "--no-edit".into()]
    } else {
        vec![
            "commit".into(),
            "--message".into(),
            format!("{file_name}: {message}"),
        ]
    }
}

#[async_trait]
impl CommitLedger for JsonLedger {
    /// Returns an empty list if the file doesn't exist.
    async fn load(&self) -> Result<Vec<Commit>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no ledger file");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::Ledger(format!("failed to read {}: {e}", self.path.display())))?;

        let commits: Vec<Commit> = serde_json::from_str(&content)
            .map_err(|e| Error::Ledger(format!("failed to parse {}: {e}", self.path.display())))?;

        debug!(count = commits.len(), "loaded ledger");
        Ok(commits)
    }

    async fn save(&self, commits: &[Commit]) -> Result<()> {
        let mut content = serde_json::to_string_pretty(commits)
            .map_err(|e| Error::Ledger(format!("failed to serialize ledger: {e}")))?;
        content.push('\n');

        fs::write(&self.path, content)
            .map_err(|e| Error::Ledger(format!("failed to write {}: {e}", self.path.display())))?;

        debug!(count = commits.len(), "saved ledger");
        Ok(())
    }

    async fn commit_state(&self, message: &str, amend: bool) -> Result<bool> {
        let path = self.path.to_string_lossy().into_owned();
        if run_quiet("git", &["add", path.as_str()], &self.repo_root).await? != 0 {
            return Ok(false);
        }

        let args = commit_args(&self.file_name(), message, amend);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Ok(run_quiet("git", &args, &self.repo_root).await? == 0)
    }
}
