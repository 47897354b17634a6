//! # Resumable Step Sequencer
//!
//! Lets sequential-looking logic (delays, while/for loops, time-bounded
//! loops) run inside a repeatedly-invoked, never-blocking host loop. The
//! caller builds a statically indexed step table once, then calls `tick()`
//! every cycle; the dispatcher resumes exactly where the previous tick left
//! off.
//!
//! ## Core Principles
//!
//! 1. **Static step table**: steps are numbered in definition order at build
//!    time, including steps nested inside loop bodies; nothing renumbers at
//!    runtime
//! 2. **Pointer-driven execution**: one persistent step pointer per instance
//!    selects the next eligible step; loops are jumps between anchor indices
//! 3. **Forward jumps chain, backward jumps defer**: a tick scans the table
//!    in index order exactly once, so a jump to a higher index runs in the
//!    same tick while a jump to a lower or equal index waits for the next
//! 4. **Never blocks**: an unsatisfied delay or loop condition returns
//!    control to the caller with all state retained for the next tick

pub mod builder;
pub mod dispatch;
pub mod snapshot;
pub mod step;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use builder::{LoopScope, SequenceBuilder};
pub use dispatch::{Sequence, Tick};
pub use snapshot::SequenceSnapshot;
pub use step::Control;
