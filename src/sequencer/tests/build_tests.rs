//! Tests for build-time structural validation

use crate::clock::ManualClock;
use crate::error::Error;
use crate::sequencer::SequenceBuilder;

#[derive(Debug, Default)]
struct Empty;

#[test]
fn test_empty_sequence_rejected() {
    let builder = SequenceBuilder::<Empty>::new();
    let err = builder.build(Empty, ManualClock::new()).unwrap_err();
    assert_eq!(err, Error::EmptySequence);
}

#[test]
fn test_empty_while_body_rejected() {
    let mut builder = SequenceBuilder::<Empty>::new();
    builder.run(|_| {});
    builder.while_loop(|_| true, |_| {});

    let err = builder.build(Empty, ManualClock::new()).unwrap_err();
    // The loop head sits at index 1, right after the single run step.
    assert_eq!(err, Error::EmptyLoopBody { start: 1 });
}

#[test]
fn test_empty_while_duration_body_rejected() {
    let mut builder = SequenceBuilder::<Empty>::new();
    builder.while_duration(100, |_| {});

    let err = builder.build(Empty, ManualClock::new()).unwrap_err();
    // Index 0 is the timer-arm step; the head follows it.
    assert_eq!(err, Error::EmptyLoopBody { start: 1 });
}

#[test]
fn test_nested_empty_inner_body_rejected() {
    let mut builder = SequenceBuilder::<Empty>::new();
    builder.while_loop(|_| true, |outer| {
        outer.while_loop(|_| true, |_| {});
    });

    assert!(matches!(
        builder.build(Empty, ManualClock::new()),
        Err(Error::EmptyLoopBody { .. })
    ));
}

#[test]
fn test_for_loop_body_never_empty() {
    // The trailing increment step counts as body, so a for-loop with no
    // caller steps still builds.
    let mut builder = SequenceBuilder::<Empty>::new();
    builder.for_loop(|_| {}, |_| false, |_| {}, |_| {});

    assert!(builder.build(Empty, ManualClock::new()).is_ok());
}

#[test]
fn test_outer_loop_with_only_inner_loop_builds() {
    let mut builder = SequenceBuilder::<Empty>::new();
    builder.while_loop(|_| false, |outer| {
        outer.while_loop(|_| false, |inner| {
            inner.run(|_| {});
        });
    });

    assert!(builder.build(Empty, ManualClock::new()).is_ok());
}
