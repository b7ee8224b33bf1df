//! Scratch git repositories for adapter tests

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run `git` in `dir`, panicking on failure; returns trimmed stdout
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Fresh repository with one commit adding `file.txt`
pub fn init_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.name", "Stable Picker"]);
    git(dir, &["config", "user.email", "picker@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    commit_file(dir, "file.txt", "base\n", "initial");
    temp
}

/// Write `name`, commit it and return the new HEAD sha
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) -> String {
    fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-q", "-m", message]);
    head(dir)
}

/// Current HEAD sha
pub fn head(dir: &Path) -> String {
    git(dir, &["rev-parse", "HEAD"])
}

/// `git status --porcelain`; empty for a clean tree
pub fn status(dir: &Path) -> String {
    git(dir, &["status", "--porcelain"])
}

/// Commit `name` on a side branch and return its sha, leaving the
/// original branch checked out
pub fn side_commit(dir: &Path, name: &str, content: &str, message: &str) -> String {
    let branch = git(dir, &["rev-parse", "--abbrev-ref", "HEAD"]);
    git(dir, &["checkout", "-q", "-b", "side"]);
    let sha = commit_file(dir, name, content, message);
    git(dir, &["checkout", "-q", branch.as_str()]);
    sha
}
