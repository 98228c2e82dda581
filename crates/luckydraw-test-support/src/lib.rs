//! Shared test mocks and utilities for the Lucky Draw engine.

mod clock;
mod rng;

pub use clock::{FixedClock, ManualClock};
pub use rng::{MockRng, SequenceRng};
