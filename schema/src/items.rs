use crate::BoostStat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HealAmount {
    /// Restores a fixed number of HP.
    Flat(u16),
    /// Restores a fraction of max HP (0.0..=1.0).
    Fraction(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal(HealAmount),
    FullHeal,
    /// Brings a fainted creature back with this fraction of its max HP.
    Revive { fraction: f32 },
    StatusCure,
    StatBoost { stat: BoostStat, multiplier: f32 },
    LevelUp { levels: u8 },
}

impl ItemEffect {
    /// Whether the effect can only target a fainted creature.
    pub fn targets_fainted(&self) -> bool {
        matches!(self, ItemEffect::Revive { .. })
    }
}
