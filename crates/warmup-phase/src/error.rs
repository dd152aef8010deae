//! Error types for the phase layer.

use warmup_engine::EngineError;

use crate::EffectKind;

/// Errors from the phase controller and event reactor.
#[derive(Debug, thiserror::Error)]
pub enum PhaseError {
    /// `activate()` was called while a warm-up is already running. The
    /// running warm-up is left untouched.
    #[error("warm-up already active ({0})")]
    AlreadyActive(EffectKind),

    /// The effect couldn't be drawn. The warm-up stays inactive.
    #[error("random source unavailable: {0}")]
    RandomSource(String),

    /// An event named a player or team the engine doesn't know. The event
    /// is dropped.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
