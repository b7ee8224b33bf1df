//! Pick planning - pure functions over the loaded ledger
//!
//! No I/O happens here; the sequencer and the dry-run report both use it.

use crate::types::Commit;
use std::collections::HashSet;

/// Indices of the commits this run should process, oldest first.
///
/// The ledger lists commits newest first, so candidates are visited in
/// reverse ledger order. That way a fix is always attempted after the commit
/// it depends on.
pub fn processing_order(commits: &[Commit]) -> Vec<usize> {
    commits
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, c)| c.is_candidate())
        .map(|(i, _)| i)
        .collect()
}

/// One candidate in a [`PickPlan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPick {
    /// Position in the ledger
    pub index: usize,
    /// Commit sha
    pub sha: String,
    /// Commit summary
    pub description: String,
    /// Prerequisite that is also picked earlier in this run; if it fails,
    /// this commit is skipped
    pub after: Option<String>,
}

impl std::fmt::Display for PlannedPick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.sha, self.description)?;
        if let Some(after) = &self.after {
            write!(f, " (after {after})")?;
        }
        Ok(())
    }
}

/// Ordered preview of a run
#[derive(Debug, Clone, Default)]
pub struct PickPlan {
    /// Candidates in processing order
    pub picks: Vec<PlannedPick>,
}

impl PickPlan {
    /// Whether there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

/// Build the processing plan for `commits`
pub fn create_pick_plan(commits: &[Commit]) -> PickPlan {
    let mut planned: HashSet<&str> = HashSet::new();
    let picks = processing_order(commits)
        .into_iter()
        .map(|index| {
            let commit = &commits[index];
            let after = commit
                .because_sha
                .as_deref()
                .filter(|b| planned.contains(b))
                .map(ToString::to_string);
            planned.insert(commit.sha.as_str());
            PlannedPick {
                index,
                sha: commit.sha.clone(),
                description: commit.description.clone(),
                after,
            }
        })
        .collect();

    PickPlan { picks }
}
