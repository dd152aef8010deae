//! The warm-up phase controller.
//!
//! Owns the one [`Phase`] value, the countdown handle, and the timer
//! service deferred work is queued on. Everything that changes the phase
//! goes through here; the event reactor and the round-termination hook
//! only read it.
//!
//! # Deferred work
//!
//! Countdown ticks, grenade regrants and respawns are queued as
//! [`Deferred`] values and come back through [`PhaseController::run_deferred`]
//! on a later frame. Each carries the activation epoch it was queued
//! under; anything from an earlier warm-up is dropped when it fires.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};
use warmup_engine::{Engine, UserId};
use warmup_hook::PhaseQuery;
use warmup_tick::{CancelOutcome, Countdown, DelayQueue, TimerService};

use crate::{
    COUNTDOWN_INTERVAL, EffectKind, EffectSource, OsRandomEffect, Phase, PhaseError,
    WARMUP_DURATION_SECS, WarmupConfig, restriction,
};

// ---------------------------------------------------------------------------
// PhaseGate
// ---------------------------------------------------------------------------

/// Shared read-only view of "is warm-up active".
///
/// The controller is the only writer. Clones are handed to the
/// round-termination hook, which reads it from inside native calls, so a
/// read is a single atomic load.
#[derive(Debug, Clone, Default)]
pub struct PhaseGate(Arc<AtomicBool>);

impl PhaseGate {
    fn set(&self, active: bool) {
        self.0.store(active, Ordering::Release);
    }
}

impl PhaseQuery for PhaseGate {
    fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// Deferred
// ---------------------------------------------------------------------------

/// Work queued on the timer service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// One second of the countdown has passed.
    CountdownTick { epoch: u64 },
    /// Hand `basename` to a player (grenade regrant).
    GrantItem {
        epoch: u64,
        userid: UserId,
        basename: &'static str,
    },
    /// Bring a dead player back.
    Respawn { epoch: u64, userid: UserId },
}

impl Deferred {
    fn epoch(&self) -> u64 {
        match self {
            Self::CountdownTick { epoch }
            | Self::GrantItem { epoch, .. }
            | Self::Respawn { epoch, .. } => *epoch,
        }
    }
}

// ---------------------------------------------------------------------------
// PhaseController
// ---------------------------------------------------------------------------

/// Drives the warm-up through its lifecycle.
pub struct PhaseController<S = OsRandomEffect, T = DelayQueue<Deferred>> {
    phase: Phase,
    /// Bumped on every activation.
    epoch: u64,
    gate: PhaseGate,
    countdown: Countdown,
    timers: T,
    effects: S,
    config: WarmupConfig,
}

impl PhaseController {
    /// A controller with OS randomness and a frame-driven delay queue.
    pub fn with_config(config: WarmupConfig) -> Self {
        Self::new(config, OsRandomEffect, DelayQueue::new())
    }
}

impl<S, T> PhaseController<S, T>
where
    S: EffectSource,
    T: TimerService<Deferred>,
{
    pub fn new(config: WarmupConfig, effects: S, timers: T) -> Self {
        Self {
            phase: Phase::Inactive,
            epoch: 0,
            gate: PhaseGate::default(),
            countdown: Countdown::new(),
            timers,
            effects,
            config,
        }
    }

    /// Starts a warm-up: draws the effect and starts the countdown.
    ///
    /// # Errors
    /// - `PhaseError::AlreadyActive` if a warm-up is running (it is left
    ///   as is).
    /// - `PhaseError::RandomSource` if the effect can't be drawn; the
    ///   phase stays inactive.
    pub fn activate(&mut self) -> Result<EffectKind, PhaseError> {
        if let Phase::Active { effect, .. } = self.phase {
            warn!(%effect, "activate() while warm-up already active, ignoring");
            return Err(PhaseError::AlreadyActive(effect));
        }

        let effect = match self.effects.draw() {
            Ok(effect) => effect,
            Err(e) => {
                warn!(error = %e, "warm-up effect draw failed, staying inactive");
                return Err(e);
            }
        };

        self.epoch += 1;
        self.phase = Phase::Active { effect, elapsed: 0 };
        self.gate.set(true);
        self.countdown.schedule(
            &mut self.timers,
            COUNTDOWN_INTERVAL,
            Deferred::CountdownTick { epoch: self.epoch },
        );

        info!(
            %effect,
            duration_secs = WARMUP_DURATION_SECS,
            epoch = self.epoch,
            "warm-up activated"
        );
        Ok(effect)
    }

    /// Ends the warm-up: lifts every player's restrictions and asks the
    /// server to restart the round.
    ///
    /// Returns `false` (and does nothing) if already inactive.
    pub fn deactivate<E>(&mut self, engine: &mut E) -> bool
    where
        E: Engine + ?Sized,
    {
        if !self.end_phase(engine) {
            return false;
        }
        engine.server_command(&self.config.restart_command);
        info!(command = %self.config.restart_command, "warm-up over, restarting round");
        true
    }

    /// Level shutdown: cancels the countdown and lifts restrictions, but
    /// doesn't restart the round since the map is going away.
    pub fn level_shutdown<E>(&mut self, engine: &mut E)
    where
        E: Engine + ?Sized,
    {
        if self.end_phase(engine) {
            info!("level shutdown, warm-up aborted");
        } else {
            // Restrictions are lifted on every shutdown.
            Self::clear_all(engine);
            debug!("level shutdown, no warm-up running");
        }
    }

    /// One countdown second.
    ///
    /// Broadcasts the time left, then either ends the warm-up (when the
    /// duration is reached) or schedules the next tick. A no-op while
    /// inactive.
    pub fn tick<E>(&mut self, engine: &mut E)
    where
        E: Engine + ?Sized,
    {
        let Phase::Active { effect, elapsed } = self.phase else {
            debug!("countdown tick while inactive, ignoring");
            return;
        };

        let remaining = WARMUP_DURATION_SECS.saturating_sub(elapsed);
        engine.broadcast_center(&format!("Warm Up: {remaining} seconds"));

        let elapsed = elapsed + 1;
        self.phase = Phase::Active { effect, elapsed };

        if elapsed >= WARMUP_DURATION_SECS {
            self.deactivate(engine);
        } else {
            self.countdown.schedule(
                &mut self.timers,
                COUNTDOWN_INTERVAL,
                Deferred::CountdownTick { epoch: self.epoch },
            );
        }
    }

    /// Runs one piece of deferred work handed back by the timer service.
    pub fn run_deferred<E>(&mut self, engine: &mut E, task: Deferred)
    where
        E: Engine + ?Sized,
    {
        if task.epoch() != self.epoch || !self.phase.is_active() {
            debug!(?task, epoch = self.epoch, "stale deferred task dropped");
            return;
        }

        match task {
            Deferred::CountdownTick { .. } => self.tick(engine),
            Deferred::GrantItem {
                userid, basename, ..
            } => match engine.player_mut(userid) {
                Some(player) if player.is_alive() => {
                    player.grant_item(basename);
                    debug!(%userid, basename, "item regranted");
                }
                Some(_) => debug!(%userid, basename, "player dead, regrant skipped"),
                None => debug!(%userid, "regrant for disconnected player dropped"),
            },
            // The team was checked when the respawn was queued; the engine's
            // view can still show the old team after a team change.
            Deferred::Respawn { userid, .. } => match engine.player_mut(userid) {
                Some(player) if !player.is_alive() => {
                    player.respawn();
                    debug!(%userid, "player respawned");
                }
                Some(_) => debug!(%userid, "respawn no longer needed"),
                None => debug!(%userid, "respawn for disconnected player dropped"),
            },
        }
    }

    /// Queues work for the current activation.
    pub(crate) fn defer(&mut self, after: Duration, task: impl FnOnce(u64) -> Deferred) {
        let task = task(self.epoch);
        self.timers.schedule(after, task);
    }

    /// Shared teardown. Returns `false` if there was nothing to end.
    fn end_phase<E>(&mut self, engine: &mut E) -> bool
    where
        E: Engine + ?Sized,
    {
        let Phase::Active { effect, elapsed } = self.phase else {
            return false;
        };

        self.phase = Phase::Inactive;
        self.gate.set(false);

        let outcome = self.countdown.cancel(&mut self.timers);
        if outcome != CancelOutcome::Cancelled {
            debug!(?outcome, "countdown was not pending");
        }

        let cleared = Self::clear_all(engine);
        debug!(%effect, elapsed, players = cleared, "warm-up ended");
        true
    }

    fn clear_all<E>(engine: &mut E) -> usize
    where
        E: Engine + ?Sized,
    {
        engine
            .connected_players()
            .into_iter()
            .filter(|&userid| restriction::clear(engine, userid))
            .count()
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// The running effect, if active.
    pub fn current_effect(&self) -> Option<EffectKind> {
        self.phase.effect()
    }

    /// Seconds elapsed in the running warm-up, if active.
    pub fn elapsed(&self) -> Option<u32> {
        self.phase.elapsed()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// A read-only view for the round-termination hook.
    pub fn gate(&self) -> PhaseGate {
        self.gate.clone()
    }

    /// Whether a countdown tick is pending.
    pub fn countdown_live(&self) -> bool {
        self.countdown.is_live(&self.timers)
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn config(&self) -> &WarmupConfig {
        &self.config
    }
}

impl<S: EffectSource> PhaseController<S, DelayQueue<Deferred>> {
    /// Advances the delay queue by one frame and runs whatever is due.
    /// Returns how many tasks ran.
    pub fn advance<E>(&mut self, engine: &mut E, dt: Duration) -> usize
    where
        E: Engine + ?Sized,
    {
        let due = self.timers.advance(dt);
        let ran = due.len();
        for task in due {
            self.run_deferred(engine, task);
        }
        ran
    }
}
