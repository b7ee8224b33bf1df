//! CLI for stable-pick

mod context;
mod run;
mod style;

pub use run::run_pick;

use anstream::println;
use async_trait::async_trait;
use clap::Parser;
use indicatif::ProgressBar;
use stable_pick::progress::ProgressCallback;
use stable_pick::types::{Commit, CommitOutcome, Pipeline, PipelineStatus};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use style::{Stylize, check, cross, link, spinner_style};

/// Backport nominated commits onto the staging branch and validate them in CI
#[derive(Debug, Parser)]
#[command(name = "stable-pick", version, about)]
pub struct Cli {
    /// Path to the staging branch checkout
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Config file (defaults to <path>/.pick.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Meson build directory
    #[arg(long)]
    pub builddir: Option<String>,

    /// Build target that must pass before publishing
    #[arg(long)]
    pub target: Option<String>,

    /// Seconds between CI status queries
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Show the processing order without changing anything (skips the
    /// sanity check and never runs meson)
    #[arg(long)]
    pub dry_run: bool,

    /// Run the sanity check, preview the processing order and ask before
    /// starting
    #[arg(long)]
    pub confirm: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Progress output for interactive runs
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Create a progress printer
    pub const fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn finish_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().ok().and_then(|mut s| s.take()) {
            spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_commit_start(&self, commit: &Commit) {
        println!(
            "{} {}: {}",
            "Commit:".emphasis(),
            commit.sha.accent(),
            commit.description
        );
    }

    async fn on_message(&self, message: &str) {
        println!("  {message}");
    }

    async fn on_pipeline(&self, pipeline: &Pipeline) {
        let label = format!("pipeline #{}", pipeline.id);
        let label = pipeline
            .web_url
            .as_deref()
            .map_or_else(|| label.clone(), |url| link(&label, url));
        println!("  Watching {label}");

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(pipeline.status.clone());
        spinner.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    async fn on_ci_pending(&self, status: &PipelineStatus) {
        if let (Ok(slot), PipelineStatus::Pending(status)) = (self.spinner.lock(), status) {
            if let Some(spinner) = slot.as_ref() {
                spinner.set_message(status.clone());
            }
        }
    }

    async fn on_commit_done(&self, commit: &Commit, outcome: &CommitOutcome) {
        self.finish_spinner();
        match outcome {
            CommitOutcome::Merged => {
                println!("  {} Successfully applied: {}", check(), commit.sha.accent());
            }
            CommitOutcome::ManualResolution(stage) => {
                println!(
                    "  {} Needs manual resolution ({stage} failed): {}",
                    cross(),
                    commit.sha.accent()
                );
            }
            CommitOutcome::Cascaded { because } => {
                println!(
                    "  {}",
                    format!("Not applying because {because} was not applied successfully")
                        .muted()
                );
            }
        }
    }
}
