//! `WarmupPlugin`: the entry points a host engine calls.
//!
//! Ties the layers together: on load it resolves and hooks the
//! round-termination routine (failing loudly if it can't), and from then
//! on routes level lifecycle, client commands, gameplay events and frames
//! into the phase controller.

use std::time::Duration;

use tracing::{debug, info, warn};
use warmup_engine::{Engine, EventCodec, GameEvent, JsonEventCodec, UserId};
use warmup_hook::{
    BinaryImage, HookHost, NativeFunction, Platform, TERMINATE_ROUND, TerminateRoundInterceptor,
    resolve, terminate_round,
};
use warmup_phase::{
    Deferred, EffectKind, EffectSource, OsRandomEffect, PhaseController, Purchase, WarmupConfig,
};
use warmup_tick::DelayQueue;

use crate::WarmupError;

/// What the host should do with a client command after the plugin saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Let the engine handle the command.
    Continue,
    /// Swallow the command.
    Block,
}

/// The warm-up plugin.
pub struct WarmupPlugin<S = OsRandomEffect, C = JsonEventCodec> {
    controller: PhaseController<S, DelayQueue<Deferred>>,
    terminate_round: NativeFunction,
    codec: C,
}

impl WarmupPlugin {
    /// Loads the plugin for the current platform with OS randomness.
    ///
    /// # Errors
    /// `WarmupError::Hook` if the round-termination routine can't be found
    /// in `image` or the hook can't be installed.
    pub fn load<I, H>(image: &I, hooks: &mut H, config: WarmupConfig) -> Result<Self, WarmupError>
    where
        I: BinaryImage + ?Sized,
        H: HookHost + ?Sized,
    {
        Self::load_with(
            image,
            hooks,
            Platform::current(),
            PhaseController::new(config, OsRandomEffect, DelayQueue::new()),
            JsonEventCodec,
        )
    }
}

impl<S, C> WarmupPlugin<S, C>
where
    S: EffectSource,
    C: EventCodec,
{
    /// Loads the plugin with an explicit platform, controller and codec.
    ///
    /// The controller must be fresh (inactive). Its phase gate is what the
    /// installed hook reads.
    pub fn load_with<I, H>(
        image: &I,
        hooks: &mut H,
        platform: Platform,
        controller: PhaseController<S, DelayQueue<Deferred>>,
        codec: C,
    ) -> Result<Self, WarmupError>
    where
        I: BinaryImage + ?Sized,
        H: HookHost + ?Sized,
    {
        let signature = terminate_round(platform);
        let address = resolve(image, &signature)?;
        let terminate_round = NativeFunction {
            name: "CCSGameRules::TerminateRound",
            address,
            signature: TERMINATE_ROUND,
        };
        hooks.install_pre_hook(
            terminate_round,
            Box::new(TerminateRoundInterceptor::new(controller.gate())),
        )?;

        info!(
            image = image.name(),
            ?platform,
            %address,
            "warm-up plugin loaded"
        );
        Ok(Self {
            controller,
            terminate_round,
            codec,
        })
    }

    /// A new map started: begin the warm-up.
    ///
    /// Returns the drawn effect, or `None` if activation failed (the
    /// warm-up is skipped for this map).
    pub fn on_level_init(&mut self, map_name: &str) -> Option<EffectKind> {
        info!(map = map_name, "level init");
        match self.controller.activate() {
            Ok(effect) => Some(effect),
            Err(e) => {
                warn!(map = map_name, error = %e, "warm-up skipped for this level");
                None
            }
        }
    }

    /// The map is going away: drop the warm-up without restarting.
    pub fn on_level_shutdown<E>(&mut self, engine: &mut E)
    where
        E: Engine + ?Sized,
    {
        self.controller.level_shutdown(engine);
    }

    /// A gameplay event. Events naming unknown players or teams are
    /// dropped.
    pub fn on_event<E>(&mut self, engine: &mut E, event: &GameEvent)
    where
        E: Engine + ?Sized,
    {
        if let Err(e) = self.controller.on_event(engine, event) {
            debug!(event = event.name(), error = %e, "event dropped");
        }
    }

    /// A raw gameplay-event payload from the host's event bus. Payloads
    /// that don't decode are dropped.
    pub fn on_event_payload<E>(&mut self, engine: &mut E, payload: &[u8])
    where
        E: Engine + ?Sized,
    {
        match self.codec.decode(payload) {
            Ok(event) => self.on_event(engine, &event),
            Err(e) => debug!(error = %e, bytes = payload.len(), "undecodable event dropped"),
        }
    }

    /// A client console command (`args[0]` is the command name).
    pub fn on_client_command<E>(
        &mut self,
        engine: &mut E,
        userid: UserId,
        args: &[&str],
    ) -> CommandResult
    where
        E: Engine + ?Sized,
    {
        match args {
            [cmd, item, ..] if cmd.eq_ignore_ascii_case("buy") => {
                let item = item.to_ascii_lowercase();
                match self.controller.on_buy(engine, userid, &item) {
                    Purchase::Allowed => CommandResult::Continue,
                    Purchase::Blocked => CommandResult::Block,
                }
            }
            _ => CommandResult::Continue,
        }
    }

    /// One host frame of `dt`: runs every deferred task that came due.
    pub fn on_frame<E>(&mut self, engine: &mut E, dt: Duration) -> usize
    where
        E: Engine + ?Sized,
    {
        self.controller.advance(engine, dt)
    }

    pub fn controller(&self) -> &PhaseController<S, DelayQueue<Deferred>> {
        &self.controller
    }

    /// The hooked round-termination routine.
    pub fn terminate_round(&self) -> NativeFunction {
        self.terminate_round
    }
}
