//! Sequence construction
//!
//! The builder assigns every step its table index in definition order,
//! including steps nested inside loop bodies, and resolves each loop's
//! anchor indices once the construct is fully laid out. Validation happens
//! in [`SequenceBuilder::build`], before the table ever runs.

use super::dispatch::Sequence;
use super::step::{Control, LoopAnchors, StepKind};
use crate::clock::Clock;
use crate::error::{Error, Result};

/* ===================== Builder ===================== */

/// Builds the static step table for one sequence.
///
/// `S` is the caller's persistent state type: the storage for every
/// variable that must survive across ticks. Declare variables as fields of
/// `S` and (re)initialize them with [`SequenceBuilder::declare`].
pub struct SequenceBuilder<S> {
    steps: Vec<StepKind<S>>,
    loops: Vec<LoopAnchors>,
    timer_slots: usize,
}

impl<S> Default for SequenceBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SequenceBuilder<S> {
    pub fn new() -> Self {
        SequenceBuilder {
            steps: Vec::new(),
            loops: Vec::new(),
            timer_slots: 0,
        }
    }

    /// A plain step: run the body, then advance.
    ///
    /// An unbroken run of these executes to completion within a single
    /// tick, since plain advancement is a forward jump.
    pub fn run(&mut self, body: impl FnMut(&mut S) + 'static) {
        self.steps.push(StepKind::Run(Box::new(body)));
    }

    /// Declares a persistent variable's per-pass initialization.
    ///
    /// The storage itself is a field of `S`, owned by the sequence instance
    /// and untouched between ticks. This step reassigns the initial value
    /// exactly once per top-to-bottom pass, so loop counters and timers
    /// reset correctly each time the sequence restarts from step 0.
    pub fn declare(&mut self, init: impl FnMut(&mut S) + 'static) {
        self.run(init);
    }

    /// Suspends the sequence for `duration_ms` without blocking the host.
    ///
    /// Two steps: one captures the current clock reading, the next stalls
    /// the pointer until the duration has elapsed. While stalled, each
    /// tick checks once and returns control to the caller.
    pub fn delay(&mut self, duration_ms: u64) {
        self.steps.push(StepKind::DelayArm);
        self.steps.push(StepKind::DelayWait { duration_ms });
    }

    /// A while-loop over a sub-sequence of steps.
    ///
    /// The condition is re-evaluated each time the loop's head step runs:
    /// on first entry, and again one tick after each full body pass (the
    /// back-edge is a backward jump, so at most one condition check happens
    /// per tick). A false condition jumps forward past the loop within the
    /// same tick.
    pub fn while_loop(
        &mut self,
        cond: impl FnMut(&S) -> bool + 'static,
        body: impl FnOnce(&mut LoopScope<'_, S>),
    ) {
        self.push_loop(
            |loop_idx| StepKind::LoopHead {
                loop_idx,
                cond: Box::new(cond),
            },
            body,
        );
    }

    /// A for-loop: init step, while-loop on `cond`, and a trailing step
    /// running `increment` after the body each iteration.
    pub fn for_loop(
        &mut self,
        init: impl FnMut(&mut S) + 'static,
        cond: impl FnMut(&S) -> bool + 'static,
        increment: impl FnMut(&mut S) + 'static,
        body: impl FnOnce(&mut LoopScope<'_, S>),
    ) {
        self.declare(init);
        self.while_loop(cond, |scope| {
            body(scope);
            scope.run(increment);
        });
    }

    /// A while-loop that runs until `duration_ms` has elapsed since the
    /// loop was first reached in the current pass.
    ///
    /// The elapsed check happens only at the loop head, so the body always
    /// runs to completion once entered; total time may overshoot the
    /// duration by up to one full body execution.
    pub fn while_duration(&mut self, duration_ms: u64, body: impl FnOnce(&mut LoopScope<'_, S>)) {
        let slot = self.timer_slots;
        self.timer_slots += 1;
        self.steps.push(StepKind::TimerArm { slot });
        self.push_loop(
            |loop_idx| StepKind::DurationHead {
                loop_idx,
                slot,
                duration_ms,
            },
            body,
        );
    }

    /// Validates the finished table and creates the sequence instance.
    pub fn build<C: Clock>(self, state: S, clock: C) -> Result<Sequence<S, C>> {
        validate(&self.steps)?;
        Ok(Sequence::from_parts(
            self.steps,
            self.loops,
            self.timer_slots,
            state,
            clock,
        ))
    }

    /// Lays out one loop construct: head step, body steps, back-edge, and
    /// the no-op tail the end anchor points at. Anchors are resolved here,
    /// after the body has claimed its indices.
    fn push_loop(
        &mut self,
        head: impl FnOnce(usize) -> StepKind<S>,
        body: impl FnOnce(&mut LoopScope<'_, S>),
    ) {
        let loop_idx = self.loops.len();
        self.loops.push(LoopAnchors { start: 0, end: 0 });

        let start = self.steps.len();
        let head_step = head(loop_idx);
        self.steps.push(head_step);

        body(&mut LoopScope {
            builder: self,
            loop_idx,
        });

        self.steps.push(StepKind::BackEdge { loop_idx });
        let end = self.steps.len();
        self.steps.push(StepKind::LoopTail);

        self.loops[loop_idx] = LoopAnchors { start, end };
    }
}

/* ===================== Loop Scope ===================== */

/// Construction surface inside a loop body.
///
/// Offers everything the top-level builder does, plus [`run_control`] for
/// steps that break out of or restart the loop. Because `run_control`
/// exists only here, break/continue outside a loop cannot be written —
/// the misuse is a compile error in the embedding code. Nested loops get
/// their own scope, so control steps always bind to the nearest enclosing
/// loop.
///
/// [`run_control`]: LoopScope::run_control
pub struct LoopScope<'a, S> {
    builder: &'a mut SequenceBuilder<S>,
    loop_idx: usize,
}

impl<S> LoopScope<'_, S> {
    /// A step whose body decides how the loop proceeds.
    ///
    /// [`Control::Break`] jumps past the loop and takes effect in the same
    /// tick; [`Control::Continue`] jumps back to the condition check and
    /// takes effect on the next tick; [`Control::Advance`] behaves like a
    /// plain step.
    pub fn run_control(&mut self, body: impl FnMut(&mut S) -> Control + 'static) {
        self.builder.steps.push(StepKind::RunControl {
            loop_idx: self.loop_idx,
            body: Box::new(body),
        });
    }

    pub fn run(&mut self, body: impl FnMut(&mut S) + 'static) {
        self.builder.run(body);
    }

    pub fn declare(&mut self, init: impl FnMut(&mut S) + 'static) {
        self.builder.declare(init);
    }

    pub fn delay(&mut self, duration_ms: u64) {
        self.builder.delay(duration_ms);
    }

    pub fn while_loop(
        &mut self,
        cond: impl FnMut(&S) -> bool + 'static,
        body: impl FnOnce(&mut LoopScope<'_, S>),
    ) {
        self.builder.while_loop(cond, body);
    }

    pub fn for_loop(
        &mut self,
        init: impl FnMut(&mut S) + 'static,
        cond: impl FnMut(&S) -> bool + 'static,
        increment: impl FnMut(&mut S) + 'static,
        body: impl FnOnce(&mut LoopScope<'_, S>),
    ) {
        self.builder.for_loop(init, cond, increment, body);
    }

    pub fn while_duration(&mut self, duration_ms: u64, body: impl FnOnce(&mut LoopScope<'_, S>)) {
        self.builder.while_duration(duration_ms, body);
    }
}

/* ===================== Validation ===================== */

/// Structural checks on the finished step table.
fn validate<S>(steps: &[StepKind<S>]) -> Result<()> {
    if steps.is_empty() {
        return Err(Error::EmptySequence);
    }

    // A loop head directly followed by its own back-edge has no body steps.
    for (idx, pair) in steps.windows(2).enumerate() {
        let head_loop = match &pair[0] {
            StepKind::LoopHead { loop_idx, .. } => Some(*loop_idx),
            StepKind::DurationHead { loop_idx, .. } => Some(*loop_idx),
            _ => None,
        };
        if let (Some(head_loop_idx), StepKind::BackEdge { loop_idx }) = (head_loop, &pair[1]) {
            if head_loop_idx == *loop_idx {
                return Err(Error::EmptyLoopBody { start: idx });
            }
        }
    }

    Ok(())
}
