//! stable-pick: backport nominated commits onto a staging branch
//!
//! Each nominated commit is cherry-picked, built, pushed and then validated
//! by the branch's CI pipeline. Commits that fail at any stage are rolled
//! back and recorded as needing manual resolution, and commits that depend
//! on them are skipped.

pub mod build;
pub mod ci;
pub mod config;
pub mod error;
pub mod ledger;
pub mod pick;
pub mod process;
pub mod progress;
pub mod types;
pub mod vcs;
pub mod version;

#[cfg(test)]
mod test_support;
