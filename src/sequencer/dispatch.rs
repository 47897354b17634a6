//! Step dispatch
//!
//! This module contains the tick() function - the heart of the sequencer.
//! One tick scans the step table in index order exactly once, executing
//! every step the pointer lands on along the way.
//!
//! ## Timing rule
//!
//! Because the scan visits each index once and never revisits, a pointer
//! mutation to a higher index (forward jump, including plain advancement)
//! is picked up later in the same scan, while a mutation to a lower or
//! equal index (backward jump) only matters on the next tick. Loops rely
//! on this asymmetry: a false condition exits same-tick, a back-edge
//! re-checks next-tick, which bounds every loop to one iteration start per
//! tick and makes an unbounded same-tick loop impossible.

use tracing::{debug, trace};

use super::snapshot::SequenceSnapshot;
use super::step::{Control, LoopAnchors, StepKind};
use crate::clock::Clock;
use crate::error::{Error, Result};

/* ===================== Tick Result ===================== */

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The pass is still in progress; call `tick()` again next cycle.
    Yielded,
    /// The pointer ran past the last step and reset to 0; the next tick
    /// starts a fresh top-to-bottom pass.
    Completed,
}

/* ===================== Sequence ===================== */

/// One sequence instance: the step table plus all state that persists
/// between ticks.
///
/// Owned exclusively by the caller that built it; independent instances
/// share nothing and may be ticked in any interleaving.
pub struct Sequence<S, C> {
    steps: Vec<StepKind<S>>,
    loops: Vec<LoopAnchors>,

    /// Persistent variable storage, caller-defined.
    state: S,
    clock: C,

    /// Index of the next step eligible to run.
    step_pointer: usize,

    /// Clock reading captured by the most recently armed delay. One cell
    /// serves the whole sequence: a single pointer means at most one delay
    /// is ever waiting at a time.
    delay_mark: u64,

    /// Start timestamps for time-bounded loops, one slot per construct.
    /// Slots are separate because nested time-bounded loops time
    /// themselves concurrently.
    timers: Vec<u64>,

    completed_passes: u64,
}

impl<S, C> std::fmt::Debug for Sequence<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("step_pointer", &self.step_pointer)
            .field("delay_mark", &self.delay_mark)
            .field("timers", &self.timers)
            .field("completed_passes", &self.completed_passes)
            .finish_non_exhaustive()
    }
}

impl<S, C: Clock> Sequence<S, C> {
    pub(crate) fn from_parts(
        steps: Vec<StepKind<S>>,
        loops: Vec<LoopAnchors>,
        timer_slots: usize,
        state: S,
        clock: C,
    ) -> Self {
        Sequence {
            steps,
            loops,
            state,
            clock,
            step_pointer: 0,
            delay_mark: 0,
            timers: vec![0; timer_slots],
            completed_passes: 0,
        }
    }

    /// Runs one scan pass over the step table.
    ///
    /// Executes every step the pointer lands on, in index order, each at
    /// most once. Returns [`Tick::Completed`] when the pointer ran past
    /// the last step and reset to 0; otherwise the sequence is stalled on
    /// a delay or loop re-entry and resumes on the next call.
    pub fn tick(&mut self) -> Tick {
        let Sequence {
            steps,
            loops,
            state,
            clock,
            step_pointer,
            delay_mark,
            timers,
            completed_passes,
        } = self;

        for idx in 0..steps.len() {
            if *step_pointer != idx {
                continue;
            }

            match &mut steps[idx] {
                StepKind::Run(body) => {
                    body(state);
                    *step_pointer = idx + 1;
                }

                StepKind::RunControl { loop_idx, body } => {
                    let anchors = loops[*loop_idx];
                    *step_pointer = match body(state) {
                        Control::Advance => idx + 1,
                        // Forward jump past the loop: same tick.
                        Control::Break => anchors.end,
                        // Backward jump to the condition check: next tick.
                        Control::Continue => anchors.start,
                    };
                }

                StepKind::DelayArm => {
                    *delay_mark = clock.now();
                    *step_pointer = idx + 1;
                }

                StepKind::DelayWait { duration_ms } => {
                    // Wrapping subtraction keeps the comparison correct
                    // across a single wrap of the clock value.
                    if clock.now().wrapping_sub(*delay_mark) >= *duration_ms {
                        *step_pointer = idx + 1;
                    }
                    // Not elapsed: pointer unchanged, the sequence yields
                    // and this step is re-checked next tick.
                }

                StepKind::LoopHead { loop_idx, cond } => {
                    if cond(state) {
                        *step_pointer = idx + 1;
                    } else {
                        // End anchor lies past the body: forward jump,
                        // exits the loop within this tick.
                        *step_pointer = loops[*loop_idx].end;
                    }
                }

                StepKind::DurationHead {
                    loop_idx,
                    slot,
                    duration_ms,
                } => {
                    if clock.now().wrapping_sub(timers[*slot]) < *duration_ms {
                        *step_pointer = idx + 1;
                    } else {
                        *step_pointer = loops[*loop_idx].end;
                    }
                }

                StepKind::TimerArm { slot } => {
                    timers[*slot] = clock.now();
                    *step_pointer = idx + 1;
                }

                StepKind::BackEdge { loop_idx } => {
                    // Always backward: the re-check waits for the next
                    // tick, bounding the loop to one iteration per tick.
                    *step_pointer = loops[*loop_idx].start;
                }

                StepKind::LoopTail => {
                    *step_pointer = idx + 1;
                }
            }

            trace!(step = idx, pointer = *step_pointer, "step executed");
        }

        if *step_pointer == steps.len() {
            *step_pointer = 0;
            *completed_passes += 1;
            debug!(passes = *completed_passes, "sequence pass completed");
            Tick::Completed
        } else {
            Tick::Yielded
        }
    }

    /* ===================== Accessors ===================== */

    /// The persistent variable storage.
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// The clock this sequence reads. Useful with clocks driven through a
    /// shared reference, such as [`crate::ManualClock`].
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Index of the next step eligible to run. 0 both before the first
    /// tick and after a completed pass.
    pub fn step_pointer(&self) -> usize {
        self.step_pointer
    }

    /// Number of full top-to-bottom passes completed so far.
    pub fn completed_passes(&self) -> u64 {
        self.completed_passes
    }

    /* ===================== Snapshot ===================== */

    /// Captures the engine-side state: pointer, delay mark, timer slots,
    /// and pass count. The caller's `S` is not included; persist it
    /// separately if needed.
    pub fn snapshot(&self) -> SequenceSnapshot {
        SequenceSnapshot {
            step_pointer: self.step_pointer,
            delay_mark: self.delay_mark,
            timers: self.timers.clone(),
            completed_passes: self.completed_passes,
        }
    }

    /// Reinstates engine state captured by [`Sequence::snapshot`] from a
    /// sequence built with the same construction calls.
    pub fn restore(&mut self, snapshot: SequenceSnapshot) -> Result<()> {
        if snapshot.step_pointer >= self.steps.len() {
            return Err(Error::SnapshotMismatch {
                reason: format!(
                    "step pointer {} out of range for {} steps",
                    snapshot.step_pointer,
                    self.steps.len()
                ),
            });
        }
        if snapshot.timers.len() != self.timers.len() {
            return Err(Error::SnapshotMismatch {
                reason: format!(
                    "{} timer slots in snapshot, sequence has {}",
                    snapshot.timers.len(),
                    self.timers.len()
                ),
            });
        }

        self.step_pointer = snapshot.step_pointer;
        self.delay_mark = snapshot.delay_mark;
        self.timers = snapshot.timers;
        self.completed_passes = snapshot.completed_passes;
        Ok(())
    }
}
