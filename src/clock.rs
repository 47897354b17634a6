//! Time sources
//!
//! The dispatcher never reads wall-clock time directly; it goes through the
//! `Clock` trait so hosts (firmware, simulations, tests) can supply their own
//! notion of elapsed milliseconds.

use std::cell::Cell;
use std::time::Instant;

/* ===================== Clock Trait ===================== */

/// A monotonically non-decreasing source of elapsed milliseconds.
///
/// Delay and time-bounded-loop durations are compared against this value
/// with wrapping subtraction, so a single unsigned wrap of the underlying
/// counter is tolerated. Non-monotonic readings are a contract violation
/// and are not detected.
pub trait Clock {
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/* ===================== Implementations ===================== */

/// Clock backed by `std::time::Instant`, measuring from construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock advanced explicitly by the caller.
///
/// Uses interior mutability so time can be moved forward through a shared
/// reference between ticks, even while a `Sequence` owns or borrows the
/// clock. This is the clock every deterministic test drives.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock { now: Cell::new(0) }
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    /// Jump time to an absolute reading.
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}

/* ===================== Tests ===================== */
