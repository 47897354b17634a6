pub mod clock;
pub mod error;
pub mod sequencer;

// Re-export main types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{Error, Result};
pub use sequencer::{Control, LoopScope, Sequence, SequenceBuilder, SequenceSnapshot, Tick};
