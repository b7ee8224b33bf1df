//! Quiet subprocess execution shared by the git, meson and ledger adapters

use crate::error::Result;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Run a program in `cwd` with output discarded, returning its exit code.
///
/// A process killed by a signal reports `-1`.
pub async fn run_quiet(program: &str, args: &[&str], cwd: &Path) -> Result<i32> {
    debug!(program, ?args, "spawning");
    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;

    let code = status.code().unwrap_or(-1);
    debug!(program, code, "exited");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exit_codes_are_reported() {
        let dir = std::env::temp_dir();
        assert_eq!(run_quiet("sh", &["-c", "exit 0"], &dir).await.unwrap(), 0);
        assert_eq!(run_quiet("sh", &["-c", "exit 3"], &dir).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let dir = std::env::temp_dir();
        let result = run_quiet("definitely-not-a-real-program-xyz", &[], &dir).await;
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
