//! Version control operations on the staging working tree

mod git;

pub use git::GitCli;

use crate::error::Result;
use crate::types::Commit;
use async_trait::async_trait;

/// Working-tree operations used by the sequencer
///
/// Implementations only report success or failure; output is not inspected.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Apply a commit's changes on top of the current tree.
    ///
    /// Returns `false` if the change did not apply. The tree is left
    /// without a half-applied change in that case.
    async fn apply(&self, commit: &Commit) -> Result<bool>;

    /// Hard-reset the working tree to `to` (e.g. `HEAD`, `HEAD~`)
    async fn reset_hard(&self, to: &str) -> Result<bool>;

    /// Push the current branch, returning the push exit code
    async fn push(&self, force: bool) -> Result<i32>;
}
