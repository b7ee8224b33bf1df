//! Recording commit resolutions
//!
//! Every resolution change is saved to the ledger, recorded as a git commit
//! and pushed before the sequencer moves on, so progress survives a crash.

use crate::error::{Error, Result};
use crate::ledger::CommitLedger;
use crate::types::{Commit, Resolution};
use crate::vcs::VersionControl;
use tracing::{info, warn};

/// Writes resolutions through the ledger and publishes them
pub struct ResolutionRecorder<'a> {
    ledger: &'a dyn CommitLedger,
    vcs: &'a dyn VersionControl,
}

impl<'a> ResolutionRecorder<'a> {
    /// Create a recorder
    pub const fn new(ledger: &'a dyn CommitLedger, vcs: &'a dyn VersionControl) -> Self {
        Self { ledger, vcs }
    }

    /// Mark `commits[index]` as needing a human.
    ///
    /// Saves the ledger, records it as a new state commit and pushes.
    /// `force_push` is needed when the branch tip moved backward (CI failure
    /// after publishing); otherwise the push is a fast-forward.
    pub async fn mark_manual_resolution(
        &self,
        commits: &mut [Commit],
        index: usize,
        force_push: bool,
    ) -> Result<()> {
        let sha = set_resolution(commits, index, Resolution::ManualResolution)?;
        self.ledger.save(commits).await?;
        self.record(&format!("Mark {sha} as needing manual resolution"), false)
            .await?;
        self.push(force_push).await
    }

    /// Mark `commits[index]` as merged and publish it.
    ///
    /// The ledger change is amended into the cherry-picked commit so the push
    /// is a fast-forward and the CI pipeline belongs to that commit.
    pub async fn mark_merged(&self, commits: &mut [Commit], index: usize) -> Result<()> {
        let sha = set_resolution(commits, index, Resolution::Merged)?;
        self.ledger.save(commits).await?;
        self.record(&format!("Mark {sha} as merged"), true).await?;
        self.push(false).await
    }

    async fn record(&self, message: &str, amend: bool) -> Result<()> {
        if !self.ledger.commit_state(message, amend).await? {
            warn!(message, amend, "failed to record ledger state");
        }
        Ok(())
    }

    async fn push(&self, force: bool) -> Result<()> {
        let code = self.vcs.push(force).await?;
        if code != 0 {
            return Err(Error::PushFailed(code));
        }
        Ok(())
    }
}

fn set_resolution(commits: &mut [Commit], index: usize, resolution: Resolution) -> Result<String> {
    let commit = commits
        .get_mut(index)
        .ok_or_else(|| Error::Internal(format!("no commit at ledger index {index}")))?;
    info!(sha = %commit.sha, from = %commit.resolution, to = %resolution, "resolution changed");
    commit.resolution = resolution;
    Ok(commit.sha.clone())
}
