//! Test helpers for sequencer tests
//!
//! Common state type and driving loops. All tests run against a
//! `ManualClock` so timing is fully deterministic.

use crate::clock::ManualClock;
use crate::sequencer::{Sequence, SequenceBuilder, Tick};

/// Persistent state used by most tests: two counters and an event log.
#[derive(Debug, Default)]
pub struct TestState {
    pub x: i64,
    pub y: i64,
    pub log: Vec<i64>,
}

/// Build a sequence over [`TestState`] with a fresh manual clock at t=0.
pub fn build_sequence(
    f: impl FnOnce(&mut SequenceBuilder<TestState>),
) -> Sequence<TestState, ManualClock> {
    let mut builder = SequenceBuilder::new();
    f(&mut builder);
    builder
        .build(TestState::default(), ManualClock::new())
        .expect("sequence build failed")
}

/// Tick until the pass completes, without touching the clock.
///
/// Returns the number of ticks used, counting the completing tick.
/// Panics if the sequence fails to complete within 1000 ticks.
pub fn run_to_completion(seq: &mut Sequence<TestState, ManualClock>) -> usize {
    run_to_completion_with(seq, 0)
}

/// Tick until the pass completes, advancing the clock by `step_ms` after
/// every yielded tick.
pub fn run_to_completion_with(
    seq: &mut Sequence<TestState, ManualClock>,
    step_ms: u64,
) -> usize {
    for ticks in 1..=1000 {
        if seq.tick() == Tick::Completed {
            return ticks;
        }
        seq.clock().advance(step_ms);
    }
    panic!("sequence did not complete within 1000 ticks");
}
