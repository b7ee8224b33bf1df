//! Sequencer - drives each candidate through apply, build, publish and CI
//!
//! Per-commit failures roll the tree back, mark the commit for manual
//! resolution and move on. Dependents of a failed commit are skipped without
//! being tried. Only the sanity check and pushes abort the run.

use crate::build::BuildSystem;
use crate::ci::{CiService, PollPolicy, wait_for_pipeline};
use crate::error::{Error, Result};
use crate::ledger::CommitLedger;
use crate::pick::plan::processing_order;
use crate::pick::resolve::ResolutionRecorder;
use crate::progress::ProgressCallback;
use crate::types::{Commit, CommitOutcome, FailedStage, RunSummary};
use crate::vcs::VersionControl;
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Default build target run for each commit
pub const DEFAULT_BUILD_TARGET: &str = "test";

/// Settings for one run
#[derive(Debug, Clone)]
pub struct SequencerOptions {
    /// Branch whose CI pipelines validate published commits
    pub staging_branch: String,
    /// Build target that must pass before publishing
    pub build_target: String,
    /// How to wait for CI
    pub poll: PollPolicy,
}

impl SequencerOptions {
    /// Defaults for `staging_branch`
    pub fn new(staging_branch: impl Into<String>) -> Self {
        Self {
            staging_branch: staging_branch.into(),
            build_target: DEFAULT_BUILD_TARGET.to_string(),
            poll: PollPolicy::default(),
        }
    }
}

/// External collaborators the sequencer drives
#[derive(Clone, Copy)]
pub struct Adapters<'a> {
    /// Commit ledger
    pub ledger: &'a dyn CommitLedger,
    /// Working tree
    pub vcs: &'a dyn VersionControl,
    /// Build system
    pub build: &'a dyn BuildSystem,
    /// CI provider
    pub ci: &'a dyn CiService,
}

/// Backports nominated commits one at a time
pub struct Sequencer<'a> {
    adapters: Adapters<'a>,
    progress: &'a dyn ProgressCallback,
    options: SequencerOptions,
    /// Held for the whole per-commit pipeline. Commits build on each other
    /// in one working tree, so at most one may be in flight.
    critical: Mutex<()>,
}

impl<'a> Sequencer<'a> {
    /// Create a sequencer
    pub fn new(
        adapters: Adapters<'a>,
        progress: &'a dyn ProgressCallback,
        options: SequencerOptions,
    ) -> Self {
        Self {
            adapters,
            progress,
            options,
            critical: Mutex::new(()),
        }
    }

    /// Run the sanity check, then process every candidate in the ledger.
    ///
    /// Returns `Ok` once all candidates were visited, however many failed.
    /// Fails with [`Error::SanityCheck`] before reading the ledger if the
    /// build cannot be configured, and with [`Error::PushFailed`] as soon as
    /// a push is rejected.
    pub async fn run(&self) -> Result<RunSummary> {
        self.sanity_check().await?;
        self.process_pending().await
    }

    /// Configure the build once; a non-zero exit means nothing can be picked.
    pub async fn sanity_check(&self) -> Result<()> {
        self.progress.on_message("Sanity testing").await;
        let code = self
            .adapters
            .build
            .configure()
            .await
            .map_err(|e| Error::SanityCheck(e.to_string()))?;
        if code != 0 {
            return Err(Error::SanityCheck(format!(
                "build configuration exited with {code}"
            )));
        }
        Ok(())
    }

    /// Load the ledger and process every candidate, without the sanity check
    pub async fn process_pending(&self) -> Result<RunSummary> {
        let mut commits = self.adapters.ledger.load().await?;
        let order = processing_order(&commits);
        info!(total = commits.len(), candidates = order.len(), "loaded ledger");

        let mut failed: HashSet<String> = HashSet::new();
        let mut summary = RunSummary::default();

        for index in order {
            let _critical = self.critical.lock().await;

            let commit = &commits[index];
            self.progress.on_commit_start(commit).await;
            info!(sha = %commit.sha, description = %commit.description, "processing commit");

            let failed_prerequisite = commit
                .because_sha
                .as_ref()
                .filter(|because| failed.contains(*because))
                .cloned();

            let outcome = match failed_prerequisite {
                Some(because) => {
                    info!(sha = %commit.sha, %because, "prerequisite failed, not applying");
                    CommitOutcome::Cascaded { because }
                }
                None => self.process_commit(&mut commits, index).await?,
            };

            let commit = &commits[index];
            if outcome.is_failure() {
                failed.insert(commit.sha.clone());
            }
            self.progress.on_commit_done(commit, &outcome).await;
            summary.outcomes.push((commit.sha.clone(), outcome));
        }

        summary.failed = failed;
        info!(
            merged = summary.merged().len(),
            manual = summary.manual().len(),
            cascaded = summary.cascaded().len(),
            "run complete"
        );
        Ok(summary)
    }

    /// Apply, build, publish and validate one commit
    async fn process_commit(&self, commits: &mut [Commit], index: usize) -> Result<CommitOutcome> {
        let Adapters { ledger, vcs, build, ci } = self.adapters;
        let recorder = ResolutionRecorder::new(ledger, vcs);
        let sha = commits[index].sha.clone();

        if !vcs.apply(&commits[index]).await? {
            warn!(%sha, "failed to apply");
            self.progress.on_message("FAILED to apply").await;
            self.rollback("HEAD").await?;
            recorder.mark_manual_resolution(commits, index, false).await?;
            return Ok(CommitOutcome::ManualResolution(FailedStage::Apply));
        }

        self.progress.on_message("Compiling project").await;
        let code = build.build_target(&self.options.build_target).await?;
        if code != 0 {
            warn!(%sha, code, "failed to compile");
            self.progress.on_message("FAILED to compile, reverting").await;
            self.rollback("HEAD~").await?;
            recorder.mark_manual_resolution(commits, index, false).await?;
            return Ok(CommitOutcome::ManualResolution(FailedStage::Build));
        }

        self.progress.on_message("Pushing update to git").await;
        recorder.mark_merged(commits, index).await?;

        self.progress.on_message("Waiting for CI to finish").await;
        let ci_outcome = match wait_for_pipeline(
            ci,
            &self.options.staging_branch,
            &self.options.poll,
            self.progress,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                // Already pushed as merged; later runs won't revisit it.
                warn!(
                    %sha,
                    error = %e,
                    "CI status unavailable, commit left published without validation"
                );
                return Err(e);
            }
        };

        if ci_outcome.is_success() {
            info!(%sha, "successfully applied");
            return Ok(CommitOutcome::Merged);
        }

        warn!(%sha, outcome = ?ci_outcome, "CI did not pass, reverting");
        self.progress.on_message("CI failed, reverting").await;
        self.rollback("HEAD~").await?;
        recorder.mark_manual_resolution(commits, index, true).await?;
        Ok(CommitOutcome::ManualResolution(FailedStage::Ci))
    }

    /// Reset the working tree. Resetting to where the tree already is
    /// changes nothing.
    async fn rollback(&self, to: &str) -> Result<()> {
        if !self.adapters.vcs.reset_hard(to).await? {
            warn!(to, "reset failed");
        }
        Ok(())
    }
}
