//! Warm-up configuration and the phase state machine.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EffectKind;

/// Length of the warm-up, in countdown ticks.
pub const WARMUP_DURATION_SECS: u32 = 45;

/// Time between two countdown ticks.
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// WarmupConfig
// ---------------------------------------------------------------------------

/// Tunables for the warm-up phase. The duration itself is fixed
/// ([`WARMUP_DURATION_SECS`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupConfig {
    /// Delay before a thrown grenade is replaced.
    pub regrant_delay: Duration,

    /// Delay before a dead player is respawned. Zero means "next frame".
    pub respawn_delay: Duration,

    /// Console command issued when the warm-up runs out.
    pub restart_command: String,

    /// Sound played to a player whose purchase was blocked.
    pub deny_sound: String,

    /// Prefix of chat lines sent by the plugin.
    pub message_prefix: String,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            regrant_delay: Duration::from_secs(2),
            respawn_delay: Duration::ZERO,
            restart_command: "mp_restartgame 1".to_string(),
            deny_sound: "buttons/weapon_cant_buy.wav".to_string(),
            message_prefix: "[Warm Up]".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the warm-up is in its lifecycle.
///
/// ```text
/// Inactive ──activate()──→ Active { elapsed: 0 } ──tick()×N──→ Inactive
///                                 │
///                                 └──deactivate() / level shutdown──→ Inactive
/// ```
///
/// `effect` and `elapsed` only exist while active, so they can't be read
/// stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Inactive,
    Active { effect: EffectKind, elapsed: u32 },
}

impl Phase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// The running effect, if active.
    pub fn effect(&self) -> Option<EffectKind> {
        match self {
            Self::Active { effect, .. } => Some(*effect),
            Self::Inactive => None,
        }
    }

    /// Seconds elapsed in the running warm-up, if active.
    pub fn elapsed(&self) -> Option<u32> {
        match self {
            Self::Active { elapsed, .. } => Some(*elapsed),
            Self::Inactive => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "Inactive"),
            Self::Active { effect, elapsed } => write!(f, "Active({effect}, {elapsed}s)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_accessors() {
        let active = Phase::Active {
            effect: EffectKind::KnifeOnly,
            elapsed: 3,
        };
        assert!(active.is_active());
        assert_eq!(active.effect(), Some(EffectKind::KnifeOnly));
        assert_eq!(active.elapsed(), Some(3));

        assert!(!Phase::Inactive.is_active());
        assert_eq!(Phase::Inactive.effect(), None);
        assert_eq!(Phase::Inactive.elapsed(), None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Inactive.to_string(), "Inactive");
        let active = Phase::Active {
            effect: EffectKind::Grenade,
            elapsed: 10,
        };
        assert_eq!(active.to_string(), "Active(Grenade, 10s)");
    }

    #[test]
    fn test_config_default() {
        let config = WarmupConfig::default();
        assert_eq!(config.regrant_delay, Duration::from_secs(2));
        assert_eq!(config.respawn_delay, Duration::ZERO);
        assert_eq!(config.restart_command, "mp_restartgame 1");
        assert_eq!(config.deny_sound, "buttons/weapon_cant_buy.wav");
    }

    #[test]
    fn test_config_partial_json_fills_defaults() {
        let config: WarmupConfig =
            serde_json::from_str(r#"{"restart_command":"mp_restartgame 3"}"#).unwrap();
        assert_eq!(config.restart_command, "mp_restartgame 3");
        assert_eq!(config.message_prefix, "[Warm Up]");
    }
}
