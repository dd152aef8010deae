//! Event reactor: engine events and client commands in, phase-aware
//! policy decisions out.

use tracing::debug;
use warmup_engine::{Engine, EngineError, GameEvent, Team, UserId};
use warmup_tick::TimerService;

use crate::controller::Deferred;
use crate::{EffectSource, PhaseController, PhaseError, restriction};

/// Verdict on a `buy` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    Allowed,
    Blocked,
}

impl<S, T> PhaseController<S, T>
where
    S: EffectSource,
    T: TimerService<Deferred>,
{
    /// `buy <item>`: blocked for everyone while warm-up is active, with a
    /// chat line and a sound to the buyer.
    pub fn on_buy<E>(&mut self, engine: &mut E, userid: UserId, item: &str) -> Purchase
    where
        E: Engine + ?Sized,
    {
        if !self.is_active() {
            return Purchase::Allowed;
        }
        if engine.player_mut(userid).is_some() {
            let config = self.config();
            let text = format!(
                "{}: -> You cannot buy {} during warm up!",
                config.message_prefix,
                title_case(item)
            );
            engine.tell(userid, &text);
            engine.play_sound(userid, &config.deny_sound);
        }
        debug!(%userid, item, "purchase blocked during warm-up");
        Purchase::Blocked
    }

    /// Dispatches one gameplay event.
    ///
    /// # Errors
    /// `PhaseError::Engine` when the event names an unknown player or team.
    /// The event is dropped and the phase is left as it was.
    pub fn on_event<E>(&mut self, engine: &mut E, event: &GameEvent) -> Result<(), PhaseError>
    where
        E: Engine + ?Sized,
    {
        match event {
            GameEvent::PlayerSpawn { userid } => self.on_spawn(engine, *userid),
            GameEvent::WeaponFire { userid, weapon } => {
                self.on_weapon_fire(engine, *userid, weapon)
            }
            GameEvent::PlayerDeath { userid } => self.respawn_policy(engine, *userid, None),
            GameEvent::PlayerTeam { userid, team } => {
                let team = Team::from_id(*team).ok_or(EngineError::UnknownTeam(*team))?;
                if team.is_playing() {
                    self.respawn_policy(engine, *userid, Some(team))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn on_spawn<E>(&mut self, engine: &mut E, userid: UserId) -> Result<(), PhaseError>
    where
        E: Engine + ?Sized,
    {
        let Some(effect) = self.current_effect() else {
            return Ok(());
        };
        match restriction::enforce_on_spawn(engine, userid, effect) {
            restriction::Enforcement::UnknownPlayer => Err(EngineError::UnknownUser(userid).into()),
            _ => Ok(()),
        }
    }

    fn on_weapon_fire<E>(
        &mut self,
        engine: &mut E,
        userid: UserId,
        weapon: &str,
    ) -> Result<(), PhaseError>
    where
        E: Engine + ?Sized,
    {
        let Some(effect) = self.current_effect() else {
            return Ok(());
        };
        let Some(basename) = restriction::reinforce_on_fire(effect, weapon) else {
            return Ok(());
        };
        match engine.player_mut(userid) {
            Some(player) if player.is_alive() => {
                let delay = self.config().regrant_delay;
                self.defer(delay, |epoch| Deferred::GrantItem {
                    epoch,
                    userid,
                    basename,
                });
                debug!(%userid, basename, "regrant scheduled");
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(EngineError::UnknownUser(userid).into()),
        }
    }

    /// Schedules a respawn if warm-up is active and the player is dead on a
    /// playing team. `team` overrides the engine's view (the team-change
    /// event fires before the engine moves the player).
    ///
    /// Returns `Ok(())` whether or not a respawn was scheduled.
    fn respawn_policy<E>(
        &mut self,
        engine: &mut E,
        userid: UserId,
        team: Option<Team>,
    ) -> Result<(), PhaseError>
    where
        E: Engine + ?Sized,
    {
        if !self.is_active() {
            return Ok(());
        }
        let player = engine
            .player_mut(userid)
            .ok_or(EngineError::UnknownUser(userid))?;
        let team = team.unwrap_or_else(|| player.team());
        if player.is_alive() || !team.is_playing() {
            return Ok(());
        }

        let delay = self.config().respawn_delay;
        self.defer(delay, |epoch| Deferred::Respawn { epoch, userid });
        debug!(%userid, %team, "respawn scheduled");
        Ok(())
    }
}

/// Capitalises the first letter of every alphabetic run and lowercases the
/// rest: `ak47` → `Ak47`, `usp_silencer` → `Usp_Silencer`.
fn title_case(item: &str) -> String {
    let mut out = String::with_capacity(item.len());
    let mut prev_alpha = false;
    for c in item.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ak47"), "Ak47");
        assert_eq!(title_case("AWP"), "Awp");
        assert_eq!(title_case("m4a1"), "M4A1");
        assert_eq!(title_case("usp_silencer"), "Usp_Silencer");
        assert_eq!(title_case(""), "");
    }
}
