//! Build system adapter

mod meson;

pub use meson::MesonBuild;

use crate::error::Result;
use async_trait::async_trait;

/// Configure and build the project under test
#[async_trait]
pub trait BuildSystem: Send + Sync {
    /// Configure the build directory, returning the exit code
    async fn configure(&self) -> Result<i32>;

    /// Build and run `target`, returning the exit code
    async fn build_target(&self, target: &str) -> Result<i32>;
}
