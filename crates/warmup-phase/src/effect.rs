//! The per-warm-up special loadout and how it is drawn.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use warmup_engine::{GRENADE, KNIFE, PISTOL};

use crate::PhaseError;

/// The loadout policy for one warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Grenades only, replaced after each throw.
    Grenade,
    /// The pistol only.
    PistolOnly,
    /// Knives only.
    KnifeOnly,
}

impl EffectKind {
    pub const ALL: [Self; 3] = [Self::Grenade, Self::PistolOnly, Self::KnifeOnly];

    /// The one weapon basename players may hold under this effect.
    pub fn allowed_weapon(self) -> &'static str {
        match self {
            Self::Grenade => GRENADE,
            Self::PistolOnly => PISTOL,
            Self::KnifeOnly => KNIFE,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grenade => write!(f, "Grenade"),
            Self::PistolOnly => write!(f, "PistolOnly"),
            Self::KnifeOnly => write!(f, "KnifeOnly"),
        }
    }
}

/// Where warm-up effects come from.
pub trait EffectSource {
    /// Draws the effect for a new warm-up.
    ///
    /// # Errors
    /// `PhaseError::RandomSource` if no randomness is available.
    fn draw(&mut self) -> Result<EffectKind, PhaseError>;
}

/// Uniform draw seeded from the operating system's entropy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomEffect;

impl EffectSource for OsRandomEffect {
    fn draw(&mut self) -> Result<EffectKind, PhaseError> {
        let mut rng =
            StdRng::try_from_os_rng().map_err(|e| PhaseError::RandomSource(e.to_string()))?;
        Ok(EffectKind::ALL[rng.random_range(0..EffectKind::ALL.len())])
    }
}

/// Always draws the same effect.
#[derive(Debug, Clone, Copy)]
pub struct FixedEffect(pub EffectKind);

impl EffectSource for FixedEffect {
    fn draw(&mut self) -> Result<EffectKind, PhaseError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_allowed_weapons() {
        assert_eq!(EffectKind::Grenade.allowed_weapon(), "hegrenade");
        assert_eq!(EffectKind::PistolOnly.allowed_weapon(), "deagle");
        assert_eq!(EffectKind::KnifeOnly.allowed_weapon(), "knife");
    }

    #[test]
    fn test_os_random_draws_every_kind() {
        let mut source = OsRandomEffect;
        let seen: HashSet<_> = (0..300).map(|_| source.draw().unwrap()).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_fixed_effect() {
        let mut source = FixedEffect(EffectKind::PistolOnly);
        assert_eq!(source.draw().unwrap(), EffectKind::PistolOnly);
        assert_eq!(source.draw().unwrap(), EffectKind::PistolOnly);
    }
}
