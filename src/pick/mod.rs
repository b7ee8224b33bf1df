//! Backport engine
//!
//! Same shape as the rest of the crate's effectful code:
//! 1. Plan - pick candidates and order them (pure, testable)
//! 2. Execute - apply, build, publish and validate each one (effectful)
//! 3. Resolve - record outcomes in the ledger and push them

mod execute;
mod plan;
mod resolve;

pub use execute::{Adapters, DEFAULT_BUILD_TARGET, Sequencer, SequencerOptions};
pub use plan::{PickPlan, PlannedPick, create_pick_plan, processing_order};
pub use resolve::ResolutionRecorder;
