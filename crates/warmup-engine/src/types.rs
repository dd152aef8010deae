//! Identity and gameplay types shared across the host-engine boundary.
//!
//! These are the values that cross between the game engine and the
//! warm-up plugin: who a player is, which team they stand on, which
//! weapon basename an event names, and the gameplay events themselves.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The engine's per-connection user id, as carried in event payloads.
///
/// A newtype over `u32` so it can't be confused with an entity index.
/// `#[serde(transparent)]` keeps it a bare number in JSON payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// Index of an entity in the world (weapons lying on the ground, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// The team a player belongs to.
///
/// The numeric ids match the engine's: 0 unassigned, 1 spectator,
/// 2 terrorists, 3 counter-terrorists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Unassigned,
    Spectator,
    Terrorist,
    CounterTerrorist,
}

impl Team {
    /// Maps an engine team id to a [`Team`]. Unknown ids yield `None`.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::Unassigned),
            1 => Some(Self::Spectator),
            2 => Some(Self::Terrorist),
            3 => Some(Self::CounterTerrorist),
            _ => None,
        }
    }

    /// The engine's numeric id for this team.
    pub fn id(self) -> i32 {
        match self {
            Self::Unassigned => 0,
            Self::Spectator => 1,
            Self::Terrorist => 2,
            Self::CounterTerrorist => 3,
        }
    }

    /// Returns `true` for the two teams that actually play rounds.
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Terrorist | Self::CounterTerrorist)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => write!(f, "Unassigned"),
            Self::Spectator => write!(f, "Spectator"),
            Self::Terrorist => write!(f, "Terrorist"),
            Self::CounterTerrorist => write!(f, "CounterTerrorist"),
        }
    }
}

// ---------------------------------------------------------------------------
// Weapons
// ---------------------------------------------------------------------------

/// Basename of the high-explosive grenade.
pub const GRENADE: &str = "hegrenade";

/// Basename of the pistol handed out in pistol-only warm-ups.
pub const PISTOL: &str = "deagle";

/// Basename of the knife.
pub const KNIFE: &str = "knife";

/// Prefix every weapon classname carries in the engine's entity list.
pub const WEAPON_CLASS_PREFIX: &str = "weapon_";

/// Turns a basename (`"deagle"`) into the engine's item name
/// (`"weapon_deagle"`), as expected by item grants.
pub fn item_name(basename: &str) -> String {
    format!("{WEAPON_CLASS_PREFIX}{basename}")
}

/// Strips the `weapon_` prefix off a classname, if present.
pub fn basename_of(classname: &str) -> &str {
    classname
        .strip_prefix(WEAPON_CLASS_PREFIX)
        .unwrap_or(classname)
}

// ---------------------------------------------------------------------------
// Gameplay events
// ---------------------------------------------------------------------------

/// A gameplay event raised by the engine's event bus.
///
/// Payloads are tagged by the engine's event name, so a spawn arrives as
/// `{"event": "player_spawn", "userid": 3}`. The `team` field of
/// `player_team` stays a raw id: the bus may carry ids the plugin does not
/// know about, and those must be dropped rather than fail decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerSpawn { userid: UserId },
    WeaponFire { userid: UserId, weapon: String },
    PlayerDeath { userid: UserId },
    PlayerTeam { userid: UserId, team: i32 },
}

impl GameEvent {
    /// The player the event is about.
    pub fn userid(&self) -> UserId {
        match self {
            Self::PlayerSpawn { userid }
            | Self::WeaponFire { userid, .. }
            | Self::PlayerDeath { userid }
            | Self::PlayerTeam { userid, .. } => *userid,
        }
    }

    /// The engine's name for this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayerSpawn { .. } => "player_spawn",
            Self::WeaponFire { .. } => "weapon_fire",
            Self::PlayerDeath { .. } => "player_death",
            Self::PlayerTeam { .. } => "player_team",
        }
    }
}
