//! meson + ninja implementation of [`BuildSystem`]

use crate::build::BuildSystem;
use crate::error::Result;
use crate::process::run_quiet;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Meson project with a ninja backend
pub struct MesonBuild {
    source_dir: PathBuf,
    builddir: String,
}

impl MesonBuild {
    /// `builddir` is relative to `source_dir`
    pub fn new(source_dir: impl Into<PathBuf>, builddir: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            builddir: builddir.into(),
        }
    }
}

#[async_trait]
impl BuildSystem for MesonBuild {
    async fn configure(&self) -> Result<i32> {
        debug!(builddir = %self.builddir, "meson setup");
        run_quiet(
            "meson",
            &["setup", "--reconfigure", self.builddir.as_str()],
            &self.source_dir,
        )
        .await
    }

    async fn build_target(&self, target: &str) -> Result<i32> {
        debug!(builddir = %self.builddir, target, "ninja");
        run_quiet("ninja", &["-C", self.builddir.as_str(), target], &self.source_dir).await
    }
}
