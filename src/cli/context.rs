//! Shared command context
//!
//! Loads configuration and builds the concrete adapters the sequencer drives.

use crate::cli::Cli;
use stable_pick::build::MesonBuild;
use stable_pick::ci::{GitLabCi, PollPolicy};
use stable_pick::config::{PickConfig, gitlab_token};
use stable_pick::error::{Error, Result};
use stable_pick::ledger::JsonLedger;
use stable_pick::pick::{Adapters, SequencerOptions};
use stable_pick::vcs::GitCli;
use stable_pick::version::staging_branch_from_file;
use std::path::PathBuf;
use tracing::debug;

/// Everything a run needs, resolved from config and flags
pub struct CommandContext {
    /// Root of the staging checkout
    pub repo_root: PathBuf,
    /// Effective configuration (file values with CLI overrides)
    pub config: PickConfig,
    /// Branch whose pipelines validate each pick
    pub staging_branch: String,
    /// Commit ledger
    pub ledger: JsonLedger,
    /// git working tree
    pub vcs: GitCli,
    /// meson/ninja build
    pub build: MesonBuild,
    /// GitLab pipelines client
    pub ci: GitLabCi,
}

impl CommandContext {
    /// Resolve config and construct adapters
    ///
    /// Nothing is executed here; the sanity check is the first action of a run.
    pub fn new(cli: &Cli) -> Result<Self> {
        if !cli.path.is_dir() {
            return Err(Error::Config(format!(
                "{} is not a directory",
                cli.path.display()
            )));
        }
        let repo_root = cli.path.canonicalize()?;

        let mut config = PickConfig::load(&repo_root, cli.config.as_deref())?;
        if let Some(builddir) = &cli.builddir {
            config.builddir.clone_from(builddir);
        }
        if let Some(target) = &cli.target {
            config.build_target.clone_from(target);
        }
        if let Some(secs) = cli.poll_interval {
            config.poll_interval_secs = secs;
        }
        config.validate()?;
        debug!(?config, "effective configuration");

        let staging_branch = staging_branch_from_file(&repo_root.join(&config.version_file))?;
        let ledger = JsonLedger::new(&repo_root, &config.ledger);
        let vcs = GitCli::new(&repo_root, config.remote.clone());
        let build = MesonBuild::new(&repo_root, config.builddir.clone());
        let ci = GitLabCi::new(&config.gitlab.api_url, &config.gitlab.project, gitlab_token())?;

        Ok(Self {
            repo_root,
            config,
            staging_branch,
            ledger,
            vcs,
            build,
            ci,
        })
    }

    /// Borrow the adapters for a sequencer
    pub fn adapters(&self) -> Adapters<'_> {
        Adapters {
            ledger: &self.ledger,
            vcs: &self.vcs,
            build: &self.build,
            ci: &self.ci,
        }
    }

    /// Sequencer settings derived from config
    pub fn sequencer_options(&self) -> SequencerOptions {
        SequencerOptions {
            staging_branch: self.staging_branch.clone(),
            build_target: self.config.build_target.clone(),
            poll: PollPolicy::every(self.config.poll_interval()),
        }
    }
}
