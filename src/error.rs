//! Error types for stable-pick

use thiserror::Error;

/// Exit code for a completed run, even when some commits need manual resolution
pub const EXIT_OK: u8 = 0;

/// Exit code for fatal errors after processing started (push failure, I/O)
pub const EXIT_FATAL: u8 = 1;

/// Exit code for a failed sanity check before any commit was touched
pub const EXIT_SANITY: u8 = 2;

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum Error {
    /// Build configuration failed before any commit was processed
    #[error("sanity check failed: {0}")]
    SanityCheck(String),

    /// `git push` exited non-zero; local and remote have diverged
    #[error("failed to push to remote (exit code {0})")]
    PushFailed(i32),

    /// Reading or writing the commit ledger failed
    #[error("ledger error: {0}")]
    Ledger(String),

    /// The version file could not be turned into a staging branch
    #[error("version error: {0}")]
    Version(String),

    /// Invalid configuration
    #[error("config error: {0}")]
    Config(String),

    /// GitLab API returned something unusable
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Spawning or waiting on a subprocess failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Process exit code this error should terminate with
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::SanityCheck(_) => EXIT_SANITY,
            _ => EXIT_FATAL,
        }
    }
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
