//! Host-engine boundary for the warm-up plugin.
//!
//! This crate is everything the plugin knows about the game engine:
//!
//! - **Types** ([`UserId`], [`EntityId`], [`Team`], [`GameEvent`]): the
//!   identities and gameplay events that cross the boundary.
//! - **Capabilities** ([`WeaponCatalog`], [`PlayerHandle`],
//!   [`PlayerRegistry`], [`EntityList`], [`Messenger`], [`ServerConsole`],
//!   and the umbrella [`Engine`]): narrow traits adapters implement over
//!   the real engine.
//! - **Codec** ([`EventCodec`], [`JsonEventCodec`]): decoding raw event
//!   payloads.
//! - **Simulation** ([`SimEngine`]): an in-memory adapter.
//!
//! ```text
//! Host engine ──events/commands──→ warm-up plugin ──capability calls──→ Host engine
//! ```

mod codec;
mod engine;
mod error;
mod sim;
mod types;

pub use codec::EventCodec;
#[cfg(feature = "json")]
pub use codec::JsonEventCodec;
pub use engine::{
    Engine, EntityList, Messenger, PlayerHandle, PlayerRegistry, ServerConsole, WeaponCatalog,
};
pub use error::EngineError;
pub use sim::{DEFAULT_CATALOG, Outbound, SimEngine, SimEntity, SimPlayer};
pub use types::{
    EntityId, GRENADE, GameEvent, KNIFE, PISTOL, Team, UserId, WEAPON_CLASS_PREFIX, basename_of,
    item_name,
};
