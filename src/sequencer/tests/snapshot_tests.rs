//! Tests for engine-state snapshot and restore

use super::helpers::{build_sequence, TestState};
use crate::clock::ManualClock;
use crate::error::Error;
use crate::sequencer::{Sequence, SequenceSnapshot, Tick};

fn delay_sequence() -> Sequence<TestState, ManualClock> {
    build_sequence(|b| {
        b.run(|s| s.log.push(1));
        b.delay(100);
        b.run(|s| s.log.push(2));
    })
}

#[test]
fn test_restore_resumes_mid_delay() {
    let mut seq = delay_sequence();
    assert_eq!(seq.tick(), Tick::Yielded); // armed at t=0
    seq.clock().advance(40);
    seq.tick();

    let snapshot = seq.snapshot();

    // A sequence rebuilt from the same construction calls picks up where
    // the first left off, given the same clock reading.
    let mut resumed = delay_sequence();
    resumed.clock().set(40);
    resumed.restore(snapshot).unwrap();

    // Does not rerun the first step, still waiting out the delay.
    resumed.clock().advance(30);
    assert_eq!(resumed.tick(), Tick::Yielded);
    assert!(resumed.state().log.is_empty());

    resumed.clock().advance(30);
    assert_eq!(resumed.tick(), Tick::Completed);
    assert_eq!(resumed.state().log, vec![2]);
}

#[test]
fn test_snapshot_serde_round_trip() {
    let mut seq = build_sequence(|b| {
        b.while_duration(500, |body| {
            body.delay(50);
        });
    });
    seq.clock().advance(10);
    seq.tick();

    let snapshot = seq.snapshot();
    let json = serde_json::to_string(&snapshot).expect("snapshot serialization failed");
    let restored: SequenceSnapshot =
        serde_json::from_str(&json).expect("snapshot deserialization failed");

    assert_eq!(restored, snapshot);
}

#[test]
fn test_restore_rejects_pointer_out_of_range() {
    let mut seq = delay_sequence();
    let mut snapshot = seq.snapshot();
    snapshot.step_pointer = 100;

    assert!(matches!(
        seq.restore(snapshot),
        Err(Error::SnapshotMismatch { .. })
    ));
}

#[test]
fn test_restore_rejects_wrong_timer_count() {
    // Snapshot taken from a sequence with one time-bounded loop cannot be
    // restored into one with none.
    let mut timed = build_sequence(|b| {
        b.while_duration(100, |body| {
            body.run(|s| s.x += 1);
        });
    });
    timed.tick();
    let snapshot = timed.snapshot();

    let mut plain = delay_sequence();
    assert!(matches!(
        plain.restore(snapshot),
        Err(Error::SnapshotMismatch { .. })
    ));
}

#[test]
fn test_fresh_snapshot_matches_initial_state() {
    let seq = delay_sequence();
    let snapshot = seq.snapshot();

    assert_eq!(snapshot.step_pointer, 0);
    assert_eq!(snapshot.completed_passes, 0);
    assert!(snapshot.timers.is_empty());
}
