//! Mock adapters for testing the sequencer
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use stable_pick::build::BuildSystem;
use stable_pick::ci::{CiService, PollPolicy};
use stable_pick::error::{Error, Result};
use stable_pick::ledger::CommitLedger;
use stable_pick::pick::{Adapters, Sequencer, SequencerOptions};
use stable_pick::progress::NoopProgress;
use stable_pick::types::{Commit, Pipeline, Resolution, RunSummary};
use stable_pick::vcs::VersionControl;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Staging branch used by the harness
pub const STAGING: &str = "staging/22.1";

/// Poll cap so a never-ending pipeline can't hang a test
pub const TEST_MAX_POLLS: u32 = 50;

/// One observable call against any adapter, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Configure,
    Load,
    Save,
    StateCommit { message: String, amend: bool },
    Apply(String),
    Reset(String),
    Build(String),
    Push { force: bool },
    LatestPipeline(String),
    PollPipeline(u64),
}

/// Call log shared by all mocks of a harness
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<Event>>>);

impl Events {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    /// Snapshot of all events
    pub fn all(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// In-memory ledger
pub struct MockLedger {
    events: Events,
    commits: Mutex<Vec<Commit>>,
    saves: Mutex<Vec<Vec<Commit>>>,
    error_on_load: Mutex<Option<String>>,
    commit_state_result: Mutex<bool>,
}

impl MockLedger {
    pub fn new(events: Events, commits: Vec<Commit>) -> Self {
        Self {
            events,
            commits: Mutex::new(commits),
            saves: Mutex::new(Vec::new()),
            error_on_load: Mutex::new(None),
            commit_state_result: Mutex::new(true),
        }
    }

    /// Make `load` return an error
    pub fn fail_load(&self, msg: &str) {
        *self.error_on_load.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `commit_state` report failure
    pub fn fail_commit_state(&self) {
        *self.commit_state_result.lock().unwrap() = false;
    }

    /// Currently persisted commits
    pub fn commits(&self) -> Vec<Commit> {
        self.commits.lock().unwrap().clone()
    }

    /// Every saved snapshot, in order
    pub fn saves(&self) -> Vec<Vec<Commit>> {
        self.saves.lock().unwrap().clone()
    }

    /// Persisted resolution of `sha`
    pub fn resolution(&self, sha: &str) -> Resolution {
        self.commits()
            .into_iter()
            .find(|c| c.sha == sha)
            .map(|c| c.resolution)
            .unwrap_or_else(|| panic!("no commit {sha} in ledger"))
    }
}

#[async_trait]
impl CommitLedger for MockLedger {
    async fn load(&self) -> Result<Vec<Commit>> {
        self.events.push(Event::Load);
        if let Some(msg) = self.error_on_load.lock().unwrap().as_ref() {
            return Err(Error::Ledger(msg.clone()));
        }
        Ok(self.commits())
    }

    async fn save(&self, commits: &[Commit]) -> Result<()> {
        self.events.push(Event::Save);
        *self.commits.lock().unwrap() = commits.to_vec();
        self.saves.lock().unwrap().push(commits.to_vec());
        Ok(())
    }

    async fn commit_state(&self, message: &str, amend: bool) -> Result<bool> {
        self.events.push(Event::StateCommit {
            message: message.to_string(),
            amend,
        });
        Ok(*self.commit_state_result.lock().unwrap())
    }
}

// =============================================================================
// Version control
// =============================================================================

/// Working tree mock; every commit applies unless told otherwise
pub struct MockVcs {
    events: Events,
    failing_applies: Mutex<HashSet<String>>,
    push_codes: Mutex<VecDeque<i32>>,
}

impl MockVcs {
    pub fn new(events: Events) -> Self {
        Self {
            events,
            failing_applies: Mutex::new(HashSet::new()),
            push_codes: Mutex::new(VecDeque::new()),
        }
    }

    /// Make `apply` fail for `sha`
    pub fn fail_apply(&self, sha: &str) {
        self.failing_applies.lock().unwrap().insert(sha.to_string());
    }

    /// Queue exit codes for upcoming pushes (0 once the queue is empty)
    pub fn set_push_codes(&self, codes: &[i32]) {
        *self.push_codes.lock().unwrap() = codes.iter().copied().collect();
    }
}

#[async_trait]
impl VersionControl for MockVcs {
    async fn apply(&self, commit: &Commit) -> Result<bool> {
        self.events.push(Event::Apply(commit.sha.clone()));
        Ok(!self.failing_applies.lock().unwrap().contains(&commit.sha))
    }

    async fn reset_hard(&self, to: &str) -> Result<bool> {
        self.events.push(Event::Reset(to.to_string()));
        Ok(true)
    }

    async fn push(&self, force: bool) -> Result<i32> {
        self.events.push(Event::Push { force });
        Ok(self.push_codes.lock().unwrap().pop_front().unwrap_or(0))
    }
}

// =============================================================================
// Build
// =============================================================================

/// Build mock with scripted exit codes
pub struct MockBuild {
    events: Events,
    configure_code: Mutex<i32>,
    error_on_configure: Mutex<bool>,
    build_codes: Mutex<VecDeque<i32>>,
}

impl MockBuild {
    pub fn new(events: Events) -> Self {
        Self {
            events,
            configure_code: Mutex::new(0),
            error_on_configure: Mutex::new(false),
            build_codes: Mutex::new(VecDeque::new()),
        }
    }

    /// Exit code for `configure`
    pub fn set_configure_code(&self, code: i32) {
        *self.configure_code.lock().unwrap() = code;
    }

    /// Make `configure` fail to spawn
    pub fn fail_configure_spawn(&self) {
        *self.error_on_configure.lock().unwrap() = true;
    }

    /// Queue exit codes for upcoming builds (0 once the queue is empty)
    pub fn set_build_codes(&self, codes: &[i32]) {
        *self.build_codes.lock().unwrap() = codes.iter().copied().collect();
    }
}

#[async_trait]
impl BuildSystem for MockBuild {
    async fn configure(&self) -> Result<i32> {
        self.events.push(Event::Configure);
        if *self.error_on_configure.lock().unwrap() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "meson not found",
            )));
        }
        Ok(*self.configure_code.lock().unwrap())
    }

    async fn build_target(&self, target: &str) -> Result<i32> {
        self.events.push(Event::Build(target.to_string()));
        Ok(self.build_codes.lock().unwrap().pop_front().unwrap_or(0))
    }
}

// =============================================================================
// CI
// =============================================================================

/// CI mock
///
/// Each `latest_pipeline` call starts the next queued script under a new
/// pipeline ID. Status queries walk the script and keep returning its last
/// entry, so `["running"]` never finishes.
pub struct MockCi {
    events: Events,
    scripts: Mutex<VecDeque<Vec<String>>>,
    running: Mutex<HashMap<u64, VecDeque<String>>>,
    next_id: Mutex<u64>,
    error_on_poll: Mutex<Option<String>>,
}

impl MockCi {
    pub fn new(events: Events) -> Self {
        Self {
            events,
            scripts: Mutex::new(VecDeque::new()),
            running: Mutex::new(HashMap::new()),
            next_id: Mutex::new(100),
            error_on_poll: Mutex::new(None),
        }
    }

    /// Queue the statuses the next pipeline will report
    pub fn push_pipeline(&self, statuses: &[&str]) {
        self.scripts
            .lock()
            .unwrap()
            .push_back(statuses.iter().map(ToString::to_string).collect());
    }

    /// Make status queries fail with a transport-level error
    pub fn fail_poll(&self, msg: &str) {
        *self.error_on_poll.lock().unwrap() = Some(msg.to_string());
    }

    /// Number of status queries made
    pub fn poll_count(&self) -> usize {
        self.events
            .all()
            .iter()
            .filter(|e| matches!(e, Event::PollPipeline(_)))
            .count()
    }
}

#[async_trait]
impl CiService for MockCi {
    async fn latest_pipeline(&self, git_ref: &str) -> Result<Option<Pipeline>> {
        self.events.push(Event::LatestPipeline(git_ref.to_string()));
        let Some(script) = self.scripts.lock().unwrap().pop_front() else {
            return Ok(None);
        };

        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let status = script.first().cloned().unwrap_or_else(|| "created".into());
        self.running.lock().unwrap().insert(id, script.into());
        Ok(Some(Pipeline {
            id,
            status,
            web_url: Some(format!("https://gitlab.example.com/pipelines/{id}")),
        }))
    }

    async fn pipeline(&self, id: u64) -> Result<Pipeline> {
        self.events.push(Event::PollPipeline(id));
        if let Some(msg) = self.error_on_poll.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }

        let mut running = self.running.lock().unwrap();
        let script = running
            .get_mut(&id)
            .unwrap_or_else(|| panic!("polled unknown pipeline {id}"));
        let status = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().expect("empty pipeline script")
        };
        Ok(Pipeline {
            id,
            status,
            web_url: None,
        })
    }
}

// =============================================================================
// Harness
// =============================================================================

/// All mocks wired to one event log
pub struct Harness {
    pub events: Events,
    pub ledger: MockLedger,
    pub vcs: MockVcs,
    pub build: MockBuild,
    pub ci: MockCi,
}

impl Harness {
    /// Harness over a ledger (newest first)
    pub fn new(commits: Vec<Commit>) -> Self {
        let events = Events::default();
        Self {
            ledger: MockLedger::new(events.clone(), commits),
            vcs: MockVcs::new(events.clone()),
            build: MockBuild::new(events.clone()),
            ci: MockCi::new(events.clone()),
            events,
        }
    }

    pub fn adapters(&self) -> Adapters<'_> {
        Adapters {
            ledger: &self.ledger,
            vcs: &self.vcs,
            build: &self.build,
            ci: &self.ci,
        }
    }

    /// Zero-delay, bounded options
    pub fn options() -> SequencerOptions {
        SequencerOptions {
            poll: PollPolicy::bounded(Duration::ZERO, TEST_MAX_POLLS),
            ..SequencerOptions::new(STAGING)
        }
    }

    /// Run a sequencer over the mocks
    pub async fn run(&self) -> Result<RunSummary> {
        Sequencer::new(self.adapters(), &NoopProgress, Self::options())
            .run()
            .await
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.all()
    }

    /// Shas passed to `apply`, in order
    pub fn applied(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Apply(sha) => Some(sha),
                _ => None,
            })
            .collect()
    }

    /// Force flags of all pushes
    pub fn pushes(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Push { force } => Some(force),
                _ => None,
            })
            .collect()
    }
}

/// Nominated, unresolved commit
pub fn commit(sha: &str) -> Commit {
    Commit::new(sha, format!("Commit for {sha}"))
}

/// Nominated commit that depends on `because`
pub fn fix_for(sha: &str, because: &str) -> Commit {
    commit(sha).because(because)
}
