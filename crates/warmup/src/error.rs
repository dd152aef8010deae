//! Unified error type for the warm-up plugin.

use warmup_engine::EngineError;
use warmup_hook::HookError;
use warmup_phase::PhaseError;

/// Top-level error wrapping each layer's error.
///
/// `#[from]` on each variant lets `?` convert layer errors directly.
#[derive(Debug, thiserror::Error)]
pub enum WarmupError {
    /// Resolving or hooking the round-termination routine failed. Fatal:
    /// the plugin refuses to load.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// Phase controller or event reactor error.
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// Engine boundary error (undecodable payload, unknown player).
    #[error(transparent)]
    Engine(#[from] EngineError),
}
