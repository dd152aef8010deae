//! # Warm-up
//!
//! A map-start warm-up for round-based game servers. For the first
//! 45 seconds of every map, purchases are blocked, rounds can't end,
//! dead players come straight back, and everyone fights with the same
//! randomly drawn loadout (grenades, pistols or knives). Then the round
//! restarts and normal play resumes.
//!
//! The host engine loads a [`WarmupPlugin`] once and forwards its
//! callbacks:
//!
//! ```rust,ignore
//! use warmup::prelude::*;
//!
//! let mut plugin = WarmupPlugin::load(&server_image, &mut detours, WarmupConfig::default())?;
//!
//! plugin.on_level_init("de_dust2");
//! plugin.on_event(&mut engine, &GameEvent::PlayerSpawn { userid });
//! if plugin.on_client_command(&mut engine, userid, &["buy", "ak47"]) == CommandResult::Block {
//!     // swallow the command
//! }
//! plugin.on_frame(&mut engine, frame_dt);
//! plugin.on_level_shutdown(&mut engine);
//! ```

mod error;
mod logging;
mod plugin;

pub use error::WarmupError;
pub use logging::init_logging;
pub use plugin::{CommandResult, WarmupPlugin};

pub use warmup_engine as engine;
pub use warmup_hook as hook;
pub use warmup_phase as phase;
pub use warmup_tick as tick;

pub mod prelude {
    pub use crate::{CommandResult, WarmupError, WarmupPlugin, init_logging};
    pub use warmup_engine::{Engine, GameEvent, SimEngine, Team, UserId};
    pub use warmup_hook::{BinaryImage, HookHost, HookTable, ModuleImage, Platform};
    pub use warmup_phase::{EffectKind, Phase, WarmupConfig};
    pub use warmup_tick::{FrameClock, FrameConfig};
}
