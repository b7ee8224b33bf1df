//! Staging branch name from the project's `VERSION` file

use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static MAJOR_MINOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)(?:\.|$)").expect("static regex is valid")
});

/// Extract `major.minor` from a version string such as `22.1.0-devel`
pub fn major_minor(version: &str) -> Result<String> {
    let release = version.split('-').next().unwrap_or_default().trim();
    let caps = MAJOR_MINOR
        .captures(release)
        .ok_or_else(|| Error::Version(format!("unrecognized version '{}'", version.trim())))?;
    Ok(format!("{}.{}", &caps[1], &caps[2]))
}

/// Staging branch for a `major.minor` release, e.g. `staging/22.1`
pub fn staging_branch(major_minor: &str) -> String {
    format!("staging/{major_minor}")
}

/// Read `path` and return the staging branch it maps to
pub fn staging_branch_from_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Version(format!("failed to read {}: {e}", path.display())))?;
    Ok(staging_branch(&major_minor(&content)?))
}
