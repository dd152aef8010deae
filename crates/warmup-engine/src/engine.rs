//! Capability traits over the host engine.
//!
//! The warm-up plugin never touches engine objects directly. Instead it
//! talks to a handful of narrow capabilities, each implemented by an
//! adapter over the real engine (or by [`SimEngine`](crate::SimEngine)
//! in tests and the demo):
//!
//! - [`WeaponCatalog`]: which weapon basenames exist
//! - [`PlayerRegistry`] / [`PlayerHandle`]: connected players and what
//!   can be done to one of them
//! - [`EntityList`]: weapons lying in the world
//! - [`Messenger`]: text and sound feedback
//! - [`ServerConsole`]: server-side console commands
//!
//! [`Engine`] bundles all of them and is blanket-implemented.

use crate::{EntityId, Team, UserId};

/// The engine's live list of weapon types.
pub trait WeaponCatalog {
    /// Every weapon basename currently known to the engine. The list can
    /// change between calls, so callers must not cache it.
    fn weapon_basenames(&self) -> Vec<String>;
}

/// What the plugin can observe about, and do to, a single player.
pub trait PlayerHandle {
    /// The player's user id.
    fn userid(&self) -> UserId;

    /// Whether the player is currently alive.
    fn is_alive(&self) -> bool;

    /// The player's current team.
    fn team(&self) -> Team;

    /// Basenames of the weapons the player is carrying, one entry per
    /// instance.
    fn weapons(&self) -> Vec<String>;

    /// Hands the player a new instance of `basename`.
    fn grant_item(&mut self, basename: &str);

    /// Removes one carried instance of `basename`, if any.
    fn remove_item(&mut self, basename: &str);

    /// Forbids the player from buying or picking up these weapons.
    fn restrict(&mut self, basenames: &[String]);

    /// Lifts restrictions on these weapons.
    fn unrestrict(&mut self, basenames: &[String]);

    /// Basenames currently restricted for this player.
    fn restricted(&self) -> Vec<String>;

    /// Brings a dead player back into the round.
    fn respawn(&mut self);
}

/// Lookup of connected players.
pub trait PlayerRegistry {
    /// User ids of every connected player.
    fn connected_players(&self) -> Vec<UserId>;

    /// Mutable access to one player. `None` if the id isn't connected.
    fn player_mut(&mut self, userid: UserId) -> Option<&mut dyn PlayerHandle>;
}

/// Weapon entities lying in the world.
pub trait EntityList {
    /// Weapon entities whose owning-player handle is absent or invalid.
    fn idle_weapons(&self) -> Vec<EntityId>;

    /// Removes an entity from the world. Unknown ids are ignored.
    fn remove_entity(&mut self, entity: EntityId);
}

/// Text and sound feedback to players.
pub trait Messenger {
    /// Center-screen text to every player.
    fn broadcast_center(&mut self, text: &str);

    /// A chat line to one player.
    fn tell(&mut self, userid: UserId, text: &str);

    /// Plays a sound sample to one player.
    fn play_sound(&mut self, userid: UserId, sample: &str);
}

/// The server console.
pub trait ServerConsole {
    /// Queues a command string for the server to execute.
    fn server_command(&mut self, command: &str);
}

/// Everything the warm-up plugin needs from the host engine.
pub trait Engine: WeaponCatalog + PlayerRegistry + EntityList + Messenger + ServerConsole {}

impl<T> Engine for T where T: WeaponCatalog + PlayerRegistry + EntityList + Messenger + ServerConsole {}
