//! Decoding of raw gameplay-event payloads.
//!
//! Hosts that forward their event bus as JSON objects hand the raw bytes
//! to an [`EventCodec`]; typed hosts can skip this module and build
//! [`GameEvent`](crate::GameEvent) values directly.

use crate::{EngineError, GameEvent};

/// Turns raw event payload bytes into a [`GameEvent`].
pub trait EventCodec: Send + Sync + 'static {
    /// Decodes one payload.
    ///
    /// # Errors
    /// Returns `EngineError::Decode` for anything that isn't a
    /// well-formed, known event.
    fn decode(&self, data: &[u8]) -> Result<GameEvent, EngineError>;
}

/// An [`EventCodec`] for JSON payloads (via `serde_json`).
///
/// ```rust
/// use warmup_engine::{EventCodec, GameEvent, JsonEventCodec, UserId};
///
/// let ev = JsonEventCodec
///     .decode(br#"{"event":"player_death","userid":4}"#)
///     .unwrap();
/// assert_eq!(ev, GameEvent::PlayerDeath { userid: UserId(4) });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEventCodec;

#[cfg(feature = "json")]
impl EventCodec for JsonEventCodec {
    fn decode(&self, data: &[u8]) -> Result<GameEvent, EngineError> {
        serde_json::from_slice(data).map_err(EngineError::Decode)
    }
}
