//! Step descriptors and control flow types
//!
//! A step is identified purely by its index in the table; the descriptor
//! holds the work to perform when the pointer lands on that index.

/* ===================== Control Flow ===================== */

/// Control flow decision returned by a loop-body step.
///
/// `Advance` is the ordinary outcome (move to the next step). `Break` and
/// `Continue` bind to the nearest enclosing loop: `Break` jumps forward to
/// the step after the loop and takes effect in the same tick, `Continue`
/// jumps backward to the condition check and takes effect on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Advance,
    Break,
    Continue,
}

/* ===================== Anchors ===================== */

/// Resolved jump targets for one loop construct.
///
/// `start` is the index of the condition-check step; `end` is the index of
/// the no-op step immediately past the back-edge. Both are filled in when
/// the loop construct finishes building.
#[derive(Debug, Clone, Copy)]
pub struct LoopAnchors {
    pub start: usize,
    pub end: usize,
}

/* ===================== Steps ===================== */

/// One entry in the step table.
///
/// The boxed bodies are caller-supplied closures over the persistent state
/// `S`; everything else is data resolved at build time.
pub enum StepKind<S> {
    /// Run the body, then advance.
    Run(Box<dyn FnMut(&mut S)>),

    /// Run the body, then jump according to the returned [`Control`].
    /// Only constructible inside a loop scope.
    RunControl {
        loop_idx: usize,
        body: Box<dyn FnMut(&mut S) -> Control>,
    },

    /// Capture the current clock reading into the delay mark, then advance.
    DelayArm,

    /// Stall until `now - delay_mark >= duration_ms`, then advance.
    DelayWait { duration_ms: u64 },

    /// Loop condition check. True advances into the body; false jumps to
    /// the loop's end anchor.
    LoopHead {
        loop_idx: usize,
        cond: Box<dyn FnMut(&S) -> bool>,
    },

    /// Time-bounded loop condition check against a timer slot.
    DurationHead {
        loop_idx: usize,
        slot: usize,
        duration_ms: u64,
    },

    /// Capture the current clock reading into a timer slot, then advance.
    TimerArm { slot: usize },

    /// Unconditional jump back to the loop's start anchor. Always a
    /// backward jump, so the condition re-check waits for the next tick.
    BackEdge { loop_idx: usize },

    /// The loop's end anchor: a no-op that advances, so a jump here chains
    /// past the loop within the same tick.
    LoopTail,
}

impl<S> std::fmt::Debug for StepKind<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Run(_) => f.write_str("Run"),
            StepKind::RunControl { loop_idx, .. } => {
                f.debug_struct("RunControl").field("loop_idx", loop_idx).finish()
            }
            StepKind::DelayArm => f.write_str("DelayArm"),
            StepKind::DelayWait { duration_ms } => f
                .debug_struct("DelayWait")
                .field("duration_ms", duration_ms)
                .finish(),
            StepKind::LoopHead { loop_idx, .. } => {
                f.debug_struct("LoopHead").field("loop_idx", loop_idx).finish()
            }
            StepKind::DurationHead {
                loop_idx,
                slot,
                duration_ms,
            } => f
                .debug_struct("DurationHead")
                .field("loop_idx", loop_idx)
                .field("slot", slot)
                .field("duration_ms", duration_ms)
                .finish(),
            StepKind::TimerArm { slot } => {
                f.debug_struct("TimerArm").field("slot", slot).finish()
            }
            StepKind::BackEdge { loop_idx } => {
                f.debug_struct("BackEdge").field("loop_idx", loop_idx).finish()
            }
            StepKind::LoopTail => f.write_str("LoopTail"),
        }
    }
}
