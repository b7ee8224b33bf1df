//! Core types for stable-pick

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Automated-backport outcome of a commit
///
/// Once a commit is `Merged` or `ManualResolution` later runs leave it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Not yet attempted (or attempted without a recorded outcome)
    #[default]
    Unresolved,
    /// Applied, built and published to the staging branch. Recorded before
    /// CI runs; a CI failure later downgrades it to `ManualResolution`.
    Merged,
    /// Needs a human to backport it
    ManualResolution,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolved => write!(f, "unresolved"),
            Self::Merged => write!(f, "merged"),
            Self::ManualResolution => write!(f, "manual resolution"),
        }
    }
}

/// A candidate patch from the commit ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Upstream commit ID (hex)
    pub sha: String,
    /// First line of the commit message
    pub description: String,
    /// Commit this one fixes or depends on
    #[serde(default)]
    pub because_sha: Option<String>,
    /// Whether the commit was nominated for the stable branch
    #[serde(default)]
    pub nominated: bool,
    /// Current resolution
    #[serde(default)]
    pub resolution: Resolution,
    /// Ledger fields owned by other tools, kept as-is on save
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Commit {
    /// Create a nominated, unresolved commit
    pub fn new(sha: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            description: description.into(),
            because_sha: None,
            nominated: true,
            resolution: Resolution::Unresolved,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the commit this one depends on
    #[must_use]
    pub fn because(mut self, sha: impl Into<String>) -> Self {
        self.because_sha = Some(sha.into());
        self
    }

    /// Whether this run should try to backport the commit
    pub fn is_candidate(&self) -> bool {
        self.nominated && self.resolution == Resolution::Unresolved
    }

    /// Abbreviated sha for display
    pub fn short_sha(&self) -> &str {
        self.sha.get(..12).unwrap_or(&self.sha)
    }
}

/// Pipeline stage a commit failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    /// Cherry-pick did not apply
    Apply,
    /// Local build or tests failed
    Build,
    /// CI pipeline did not succeed
    Ci,
}

impl std::fmt::Display for FailedStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apply => write!(f, "apply"),
            Self::Build => write!(f, "build"),
            Self::Ci => write!(f, "ci"),
        }
    }
}

/// What happened to one candidate during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Published and CI passed
    Merged,
    /// Rolled back and marked for manual resolution
    ManualResolution(FailedStage),
    /// Skipped because the commit it depends on failed in this run
    Cascaded {
        /// Failed prerequisite sha
        because: String,
    },
}

impl CommitOutcome {
    /// Whether the commit belongs in the failure set
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Merged)
    }
}

/// Result of a completed run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Candidates in processing order with their outcome
    pub outcomes: Vec<(String, CommitOutcome)>,
    /// Shas that failed or were cascaded in this run
    pub failed: HashSet<String>,
}

impl RunSummary {
    /// Shas that were merged
    pub fn merged(&self) -> Vec<&str> {
        self.filter(|o| matches!(o, CommitOutcome::Merged))
    }

    /// Shas that now need manual resolution
    pub fn manual(&self) -> Vec<&str> {
        self.filter(|o| matches!(o, CommitOutcome::ManualResolution(_)))
    }

    /// Shas skipped because a prerequisite failed
    pub fn cascaded(&self) -> Vec<&str> {
        self.filter(|o| matches!(o, CommitOutcome::Cascaded { .. }))
    }

    /// Outcome recorded for a sha, if it was a candidate
    pub fn outcome_of(&self, sha: &str) -> Option<&CommitOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| s == sha)
            .map(|(_, o)| o)
    }

    fn filter(&self, pred: impl Fn(&CommitOutcome) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| pred(o))
            .map(|(s, _)| s.as_str())
            .collect()
    }
}

/// A CI pipeline as reported by the CI service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    /// Pipeline ID
    pub id: u64,
    /// Raw status string
    pub status: String,
    /// Web URL for the pipeline
    pub web_url: Option<String>,
}

/// Classified pipeline status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Still going (created, pending, running, ...)
    Pending(String),
    /// Pipeline passed
    Success,
    /// Pipeline failed
    Failed,
    /// Anything else, treated like a failure
    Unknown(String),
}

impl PipelineStatus {
    /// Statuses that keep the poll going
    pub const PENDING: [&'static str; 6] = [
        "created",
        "waiting_for_resources",
        "preparing",
        "pending",
        "running",
        "scheduled",
    ];

    /// Classify a raw status string
    pub fn parse(status: &str) -> Self {
        match status {
            "success" => Self::Success,
            "failed" => Self::Failed,
            s if Self::PENDING.contains(&s) => Self::Pending(s.to_string()),
            s => Self::Unknown(s.to_string()),
        }
    }

    /// Whether polling stops at this status
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending(_))
    }
}

/// Terminal result of waiting on CI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Pipeline succeeded
    Success,
    /// Pipeline reported `failed`
    Failed,
    /// Pipeline reported a status we don't know
    Unexpected(String),
    /// No pipeline exists for the branch
    Missing,
    /// A bounded poll policy ran out of attempts
    Exhausted,
}

impl PipelineOutcome {
    /// Only `Success` counts as success
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
