//! Progress reporting for long-running runs

use crate::types::{Commit, CommitOutcome, Pipeline, PipelineStatus};
use async_trait::async_trait;

/// Receives user-facing progress while the sequencer runs
///
/// Logging goes through `tracing`; this trait is for the interactive output.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A candidate is about to be processed
    async fn on_commit_start(&self, commit: &Commit);

    /// Free-form status line
    async fn on_message(&self, message: &str);

    /// The pipeline to watch was found
    async fn on_pipeline(&self, pipeline: &Pipeline);

    /// The pipeline is still running; called before each wait
    async fn on_ci_pending(&self, status: &PipelineStatus);

    /// A candidate reached its outcome for this run
    async fn on_commit_done(&self, commit: &Commit, outcome: &CommitOutcome);
}

/// Progress callback that discards everything
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_commit_start(&self, _commit: &Commit) {}
    async fn on_message(&self, _message: &str) {}
    async fn on_pipeline(&self, _pipeline: &Pipeline) {}
    async fn on_ci_pending(&self, _status: &PipelineStatus) {}
    async fn on_commit_done(&self, _commit: &Commit, _outcome: &CommitOutcome) {}
}
