//! Warm-up phase orchestration.
//!
//! For a fixed time after each map starts, purchases are blocked, rounds
//! can't end, and every player is held to one randomly drawn loadout.
//!
//! # Key types
//!
//! - [`PhaseController`]: owns the [`Phase`] state machine, the countdown,
//!   and the queue of deferred work
//! - [`restriction`]: the weapon restriction engine (pure policy over the
//!   engine's weapon catalog)
//! - [`Purchase`] and [`PhaseController::on_event`]: the event reactor
//! - [`EffectKind`] / [`EffectSource`]: the loadout and how it's drawn
//! - [`PhaseGate`]: the read-only view handed to the round-termination
//!   hook
//! - [`WarmupConfig`]: tunables

mod config;
mod controller;
mod effect;
mod error;
mod reactor;
pub mod restriction;

pub use config::{COUNTDOWN_INTERVAL, Phase, WARMUP_DURATION_SECS, WarmupConfig};
pub use controller::{Deferred, PhaseController, PhaseGate};
pub use effect::{EffectKind, EffectSource, FixedEffect, OsRandomEffect};
pub use error::PhaseError;
pub use reactor::Purchase;
pub use restriction::Enforcement;
