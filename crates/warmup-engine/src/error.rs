//! Error types for the engine boundary.

use crate::UserId;

/// Errors raised while talking to, or decoding data from, the host engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An event payload could not be decoded (malformed JSON, missing
    /// `userid`, unknown event name, ...).
    #[cfg(feature = "json")]
    #[error("event decode failed: {0}")]
    Decode(serde_json::Error),

    /// An event or command named a user the engine doesn't know.
    #[error("unknown user {0}")]
    UnknownUser(UserId),

    /// A team id outside the engine's known range.
    #[error("unknown team id {0}")]
    UnknownTeam(i32),
}
