//! Configuration loaded from `.pick.toml`

use crate::ci::DEFAULT_POLL_INTERVAL;
use crate::error::{Error, Result};
use crate::ledger::LEDGER_FILE;
use crate::pick::DEFAULT_BUILD_TARGET;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Config filename looked up in the repository root
pub const REPO_CONFIG_FILE: &str = ".pick.toml";

/// Environment variables checked for a GitLab token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITLAB_TOKEN", "CI_JOB_TOKEN"];

/// GitLab connection settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitLabConfig {
    /// API root, e.g. `https://gitlab.freedesktop.org/api/v4`
    pub api_url: String,
    /// Project ID or `group/name` path
    pub project: String,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            api_url: "https://gitlab.freedesktop.org/api/v4".to_string(),
            project: "176".to_string(),
        }
    }
}

/// All settings for a run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickConfig {
    /// Ledger file, relative to the repository root
    pub ledger: PathBuf,
    /// File holding the project version, relative to the repository root
    pub version_file: PathBuf,
    /// Meson build directory, relative to the repository root
    pub builddir: String,
    /// Build target that must pass before publishing
    pub build_target: String,
    /// Remote to push to (git's default when unset)
    pub remote: Option<String>,
    /// Seconds between CI status queries
    pub poll_interval_secs: u64,
    /// GitLab settings
    pub gitlab: GitLabConfig,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            ledger: PathBuf::from(LEDGER_FILE),
            version_file: PathBuf::from("VERSION"),
            builddir: "builddir".to_string(),
            build_target: DEFAULT_BUILD_TARGET.to_string(),
            remote: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            gitlab: GitLabConfig::default(),
        }
    }
}

impl PickConfig {
    /// Load configuration.
    ///
    /// Uses `explicit` if given (it must exist), otherwise the first of
    /// `<repo>/.pick.toml` and `<config dir>/stable-pick/config.toml` that
    /// exists, otherwise defaults.
    pub fn load(repo_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = [
            Some(repo_root.join(REPO_CONFIG_FILE)),
            dirs::config_dir().map(|d| d.join("stable-pick").join("config.toml")),
        ];
        match candidates.into_iter().flatten().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::parse(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse TOML config text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde can't
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.gitlab.api_url)
            .map_err(|e| Error::Config(format!("invalid gitlab.api_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "gitlab.api_url must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.gitlab.project.is_empty() {
            return Err(Error::Config("gitlab.project must not be empty".into()));
        }
        if self.build_target.is_empty() {
            return Err(Error::Config("build_target must not be empty".into()));
        }
        Ok(())
    }

    /// Wait between CI status queries
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// GitLab token from the environment, if any
pub fn gitlab_token() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}
