//! Serializable engine state
//!
//! Step bodies are closures and cannot be serialized; what can is the small
//! engine-side state that decides where execution resumes. A host that
//! rebuilds the same sequence after a restart can restore this snapshot and
//! continue mid-pass.

use serde::{Deserialize, Serialize};

/// Engine state of one sequence, captured between ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSnapshot {
    /// Index of the next step eligible to run.
    pub step_pointer: usize,
    /// Clock reading captured by the most recently armed delay.
    pub delay_mark: u64,
    /// Start timestamps of time-bounded loops, one per construct.
    pub timers: Vec<u64>,
    /// Full passes completed so far.
    pub completed_passes: u64,
}
