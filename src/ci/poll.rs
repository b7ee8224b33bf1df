//! Pipeline polling state machine
//!
//! `QUERY_LATEST -> POLLING -> {SUCCESS, FAILED}`. Polling keeps going while
//! the pipeline reports one of the pending statuses; `success` ends it, and
//! every other status (including ones we have never seen) is a failure.

use crate::ci::CiService;
use crate::error::Result;
use crate::progress::ProgressCallback;
use crate::types::{PipelineOutcome, PipelineStatus};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default wait between status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Fixed-interval retry policy for the status poll
///
/// No backoff. With `max_polls: None` the poll waits for CI indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between two status queries
    pub interval: Duration,
    /// Give up after this many status queries
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::every(DEFAULT_POLL_INTERVAL)
    }
}

impl PollPolicy {
    /// Unbounded poll with a fixed interval
    pub const fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_polls: None,
        }
    }

    /// Poll at most `max_polls` times
    pub const fn bounded(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls: Some(max_polls),
        }
    }

    fn exhausted(&self, polls: u32) -> bool {
        self.max_polls.is_some_and(|max| polls >= max)
    }
}

/// Wait for the newest pipeline on `git_ref` to finish.
///
/// Transport errors are returned as `Err`; every CI verdict, including a
/// missing pipeline, is an `Ok` outcome.
pub async fn wait_for_pipeline(
    ci: &dyn CiService,
    git_ref: &str,
    policy: &PollPolicy,
    progress: &dyn ProgressCallback,
) -> Result<PipelineOutcome> {
    let Some(latest) = ci.latest_pipeline(git_ref).await? else {
        warn!(git_ref, "no pipeline found for branch");
        return Ok(PipelineOutcome::Missing);
    };
    progress.on_pipeline(&latest).await;

    let id = latest.id;
    let mut polls = 0_u32;
    loop {
        let pipeline = ci.pipeline(id).await?;
        polls += 1;

        match PipelineStatus::parse(&pipeline.status) {
            PipelineStatus::Success => {
                info!(pipeline_id = id, polls, "pipeline succeeded");
                return Ok(PipelineOutcome::Success);
            }
            PipelineStatus::Failed => {
                info!(pipeline_id = id, polls, "pipeline failed");
                return Ok(PipelineOutcome::Failed);
            }
            PipelineStatus::Unknown(status) => {
                warn!(pipeline_id = id, %status, "unexpected pipeline status");
                return Ok(PipelineOutcome::Unexpected(status));
            }
            pending @ PipelineStatus::Pending(_) => {
                if policy.exhausted(polls) {
                    warn!(pipeline_id = id, polls, "giving up on pipeline");
                    return Ok(PipelineOutcome::Exhausted);
                }
                debug!(pipeline_id = id, status = %pipeline.status, "pipeline still running");
                progress.on_ci_pending(&pending).await;
                if !policy.interval.is_zero() {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }
}
