//! Commit ledger: the persisted list of backport candidates

mod storage;

pub use storage::{JsonLedger, LEDGER_FILE};

use crate::error::Result;
use crate::types::Commit;
use async_trait::async_trait;

/// Load, save and record the candidate list
#[async_trait]
pub trait CommitLedger: Send + Sync {
    /// Load all commits, newest first
    async fn load(&self) -> Result<Vec<Commit>>;

    /// Persist all commits
    async fn save(&self, commits: &[Commit]) -> Result<()>;

    /// Record the saved ledger in version control.
    ///
    /// With `amend` the change is folded into the current head commit and
    /// `message` is ignored. Returns `false` if recording failed.
    async fn commit_state(&self, message: &str, amend: bool) -> Result<bool>;
}
