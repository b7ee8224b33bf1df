//! CI status client
//!
//! Finds the newest pipeline for the staging branch and polls it until it
//! reaches a terminal status.

mod gitlab;
mod poll;

pub use gitlab::GitLabCi;
pub use poll::{DEFAULT_POLL_INTERVAL, PollPolicy, wait_for_pipeline};

use crate::error::Result;
use crate::types::Pipeline;
use async_trait::async_trait;

/// Pipeline queries against the CI provider
#[async_trait]
pub trait CiService: Send + Sync {
    /// Most recent pipeline for `git_ref`, if any
    async fn latest_pipeline(&self, git_ref: &str) -> Result<Option<Pipeline>>;

    /// Current state of pipeline `id`
    async fn pipeline(&self, id: u64) -> Result<Pipeline>;
}
