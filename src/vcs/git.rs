//! `git` command line implementation of [`VersionControl`]

use crate::error::Result;
use crate::process::run_quiet;
use crate::types::Commit;
use crate::vcs::VersionControl;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Runs `git` in a checkout of the staging branch
pub struct GitCli {
    workdir: PathBuf,
    remote: Option<String>,
}

impl GitCli {
    /// Create an adapter for the checkout at `workdir`
    pub fn new(workdir: impl Into<PathBuf>, remote: Option<String>) -> Self {
        Self {
            workdir: workdir.into(),
            remote,
        }
    }

    async fn git(&self, args: &[&str]) -> Result<i32> {
        run_quiet("git", args, &self.workdir).await
    }
}

/// Arguments for `git push`
pub(crate) fn push_args(force: bool, remote: Option<&str>) -> Vec<&str> {
    let mut args = vec!["push"];
    if force {
        args.push("-f");
    }
    if let Some(remote) = remote {
        args.push(remote);
    }
    args
}

#[async_trait]
impl VersionControl for GitCli {
    async fn apply(&self, commit: &Commit) -> Result<bool> {
        debug!(sha = %commit.sha, "cherry-picking");
        if self.git(&["cherry-pick", "-x", commit.sha.as_str()]).await? == 0 {
            return Ok(true);
        }

        // Leave no conflicted cherry-pick behind; reset_hard follows anyway.
        if self.git(&["cherry-pick", "--abort"]).await? != 0 {
            warn!(sha = %commit.sha, "cherry-pick --abort failed");
        }
        Ok(false)
    }

    async fn reset_hard(&self, to: &str) -> Result<bool> {
        debug!(to, "resetting working tree");
        Ok(self.git(&["reset", "--hard", to]).await? == 0)
    }

    async fn push(&self, force: bool) -> Result<i32> {
        debug!(force, remote = ?self.remote, "pushing");
        self.git(&push_args(force, self.remote.as_deref())).await
    }
}
