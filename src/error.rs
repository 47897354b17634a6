//! Error types for sequence construction and state restoration

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors caught when a step table is built or restored.
///
/// There is no runtime error taxonomy beyond this: step bodies are arbitrary
/// caller code, and a condition that never becomes true is a caller logic
/// defect the dispatcher does not detect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The builder produced no steps at all.
    #[error("sequence contains no steps")]
    EmptySequence,

    /// A loop head is immediately followed by its own back-edge: the loop
    /// would re-check its condition once per tick forever without running
    /// any body step.
    #[error("loop starting at step {start} has an empty body")]
    EmptyLoopBody { start: usize },

    /// A snapshot does not fit this sequence's step table.
    #[error("snapshot does not match sequence shape: {reason}")]
    SnapshotMismatch { reason: String },
}
