//! Timing for the warm-up plugin.
//!
//! - [`TimerService`] / [`DelayQueue`]: the host's timer service. Deferred
//!   tasks are queued here and handed back on a later frame.
//! - [`Countdown`]: owns the one live countdown handle and cancels it
//!   without ever failing ([`CancelOutcome`]).
//! - [`FrameClock`]: a tokio-driven fixed-rate frame loop for running
//!   outside a game server.
//!
//! Everything runs on one thread: timers never call back on their own,
//! the caller drains them once per frame.

mod countdown;
mod frame;
mod timer;

pub use countdown::{CancelOutcome, Countdown};
pub use frame::{FrameClock, FrameConfig, FrameInfo};
pub use timer::{DelayQueue, TaskId, TimerService};
