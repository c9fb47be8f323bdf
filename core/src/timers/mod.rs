//! User-defined timers and countdowns
//!
//! Timers live in a rule set's [`TimerRegistry`] and are shared by handle with
//! every condition that watches them and every action that drives them.

mod registry;
mod timer;

pub use registry::{TimerHandle, TimerRegistry};
pub use timer::{DEFAULT_COUNTDOWN_SECS, Timer};
