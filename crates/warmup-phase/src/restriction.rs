//! Weapon restriction engine.
//!
//! A pure policy: given an [`EffectKind`] and the engine's live weapon
//! catalog, which basenames are off-limits and which single weapon the
//! player should hold. Nothing here is stored; the catalog is queried
//! afresh on every call.
//!
//! Grants and removals only happen to living players. A dead or unknown
//! player is skipped, never an error.

use tracing::debug;
use warmup_engine::{Engine, UserId, basename_of, item_name};

use crate::EffectKind;

/// What happened when a loadout was enforced on a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Restrictions set and the allowed weapon is in hand.
    Applied,
    /// The player is dead; nothing was touched.
    PlayerDead,
    /// No such player is connected.
    UnknownPlayer,
}

/// Every basename in `catalog` except the one `effect` allows.
pub fn restricted_basenames(effect: EffectKind, catalog: &[String]) -> Vec<String> {
    let allowed = effect.allowed_weapon();
    catalog
        .iter()
        .filter(|name| name.as_str() != allowed)
        .cloned()
        .collect()
}

/// Restricts everything but the effect's weapon and leaves the player
/// holding exactly one instance of it.
///
/// Any other carried weapon is removed; the allowed weapon is granted only
/// if the player doesn't already carry one.
pub fn apply<E>(engine: &mut E, userid: UserId, effect: EffectKind) -> Enforcement
where
    E: Engine + ?Sized,
{
    let catalog = engine.weapon_basenames();
    let Some(player) = engine.player_mut(userid) else {
        return Enforcement::UnknownPlayer;
    };
    if !player.is_alive() {
        debug!(%userid, %effect, "player dead, loadout skipped");
        return Enforcement::PlayerDead;
    }

    let allowed = effect.allowed_weapon();
    let mut holding = false;
    for weapon in player.weapons() {
        if weapon == allowed && !holding {
            holding = true;
        } else {
            player.remove_item(&weapon);
        }
    }

    player.restrict(&restricted_basenames(effect, &catalog));
    if !holding {
        player.grant_item(allowed);
    }
    debug!(%userid, %effect, item = %item_name(allowed), granted = !holding, "loadout applied");
    Enforcement::Applied
}

/// Lifts every restriction in the catalog for one player.
///
/// Returns `false` if the player isn't connected. Works on dead players
/// too: restrictions aren't items.
pub fn clear<E>(engine: &mut E, userid: UserId) -> bool
where
    E: Engine + ?Sized,
{
    let catalog = engine.weapon_basenames();
    match engine.player_mut(userid) {
        Some(player) => {
            player.unrestrict(&catalog);
            true
        }
        None => false,
    }
}

/// Removes every weapon entity lying in the world without an owner.
/// Returns how many were removed.
pub fn sweep_idle_weapons<E>(engine: &mut E) -> usize
where
    E: Engine + ?Sized,
{
    let idle = engine.idle_weapons();
    for entity in &idle {
        engine.remove_entity(*entity);
    }
    if !idle.is_empty() {
        debug!(removed = idle.len(), "idle weapons swept");
    }
    idle.len()
}

/// Spawn-time enforcement: sweeps idle weapons so nothing stray can be
/// picked up, then applies the loadout. A spawn for an unknown player
/// touches nothing.
pub fn enforce_on_spawn<E>(engine: &mut E, userid: UserId, effect: EffectKind) -> Enforcement
where
    E: Engine + ?Sized,
{
    if engine.player_mut(userid).is_none() {
        return Enforcement::UnknownPlayer;
    }
    sweep_idle_weapons(engine);
    apply(engine, userid, effect)
}

/// Fire-time reinforcement: the item to hand back after `weapon_fired`,
/// if any. Only a thrown grenade under [`EffectKind::Grenade`] is
/// replaced. Accepts both `hegrenade` and `weapon_hegrenade`.
pub fn reinforce_on_fire(effect: EffectKind, weapon_fired: &str) -> Option<&'static str> {
    let allowed = effect.allowed_weapon();
    (effect == EffectKind::Grenade && basename_of(weapon_fired) == allowed).then_some(allowed)
}
