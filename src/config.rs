//! Balance configuration.
//!
//! Every tunable number in the engine lives here. `BalanceConfig::default()` is
//! the balance baseline; a RON file can override any subset of it.

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTuning {
    /// Added to `2 * level / 5` in the level factor.
    pub level_offset: f32,
    /// Divides the level/power/stat product.
    pub divisor: f32,
    /// Added after the division.
    pub flat_bonus: f32,
    /// Damage change per level of difference between attacker and defender.
    pub level_diff_step: f32,
    pub level_diff_min: f32,
    pub level_diff_max: f32,
    /// Critical hit chance on a 1..=100 roll.
    pub crit_chance_percent: u8,
    pub crit_multiplier: f32,
    /// Extra multiplier on top of a super-effective hit.
    pub super_effective_bonus: f32,
    pub jitter_min: f32,
    pub jitter_max: f32,
    pub min_damage: u16,
}

impl Default for DamageTuning {
    fn default() -> Self {
        Self {
            level_offset: 2.0,
            divisor: 50.0,
            flat_bonus: 5.0,
            level_diff_step: 0.04,
            level_diff_min: 0.5,
            level_diff_max: 1.5,
            crit_chance_percent: 10,
            crit_multiplier: 1.5,
            super_effective_bonus: 1.25,
            jitter_min: 0.85,
            jitter_max: 1.10,
            min_damage: 1,
        }
    }
}

/// One linear segment of a tiered reward curve: `base + per_level * (level - start)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardTier {
    pub start_level: u8,
    pub base: f32,
    pub per_level: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    /// Experience tiers, ordered by `start_level`.
    pub experience_tiers: Vec<RewardTier>,
    pub currency_tiers: Vec<RewardTier>,
    pub boss_experience_multiplier: f32,
    pub boss_currency_multiplier: f32,
    pub jitter_min: f32,
    pub jitter_max: f32,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            experience_tiers: vec![
                RewardTier { start_level: 0, base: 20.0, per_level: 8.0 },
                RewardTier { start_level: 10, base: 100.0, per_level: 12.0 },
                RewardTier { start_level: 25, base: 280.0, per_level: 18.0 },
            ],
            currency_tiers: vec![
                RewardTier { start_level: 0, base: 10.0, per_level: 5.0 },
                RewardTier { start_level: 10, base: 60.0, per_level: 8.0 },
                RewardTier { start_level: 25, base: 180.0, per_level: 12.0 },
            ],
            boss_experience_multiplier: 2.5,
            boss_currency_multiplier: 3.0,
            jitter_min: 0.9,
            jitter_max: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub max_level: u8,
    /// Experience needed to leave a level is `level * xp_per_level`.
    pub xp_per_level: u32,
    pub stat_growth: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            max_level: 50,
            xp_per_level: 100,
            stat_growth: 1.1,
        }
    }
}

/// Stat formula for generated opponents: `base + per_level * level`, scaled for bosses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentTuning {
    pub hp_base: f32,
    pub hp_per_level: f32,
    pub stat_base: f32,
    pub stat_per_level: f32,
    pub boss_stat_multiplier: f32,
    /// Power bonus for opponents' generated moves.
    pub move_power_multiplier: f32,
}

impl Default for OpponentTuning {
    fn default() -> Self {
        Self {
            hp_base: 30.0,
            hp_per_level: 5.0,
            stat_base: 10.0,
            stat_per_level: 2.0,
            boss_stat_multiplier: 1.5,
            move_power_multiplier: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub damage: DamageTuning,
    pub rewards: RewardTuning,
    pub progression: ProgressionTuning,
    pub opponents: OpponentTuning,
    pub max_roster_size: Option<usize>,
}

pub const DEFAULT_ROSTER_SIZE: usize = 6;

impl BalanceConfig {
    pub fn roster_size(&self) -> usize {
        self.max_roster_size.unwrap_or(DEFAULT_ROSTER_SIZE)
    }

    /// Parse a RON document. Missing fields keep their baseline values.
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: BalanceConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded balance config");
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let d = &self.damage;
        if d.crit_chance_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "crit_chance_percent must be at most 100, got {}",
                d.crit_chance_percent
            )));
        }
        if d.divisor <= 0.0 {
            return Err(ConfigError::Invalid("damage divisor must be positive".to_string()));
        }
        if d.crit_multiplier < 1.0 {
            return Err(ConfigError::Invalid("crit_multiplier must be at least 1".to_string()));
        }
        if d.level_diff_min <= 0.0 || d.level_diff_min > d.level_diff_max {
            return Err(ConfigError::Invalid(
                "level_diff_min must be positive and not above level_diff_max".to_string(),
            ));
        }
        check_band("damage jitter", d.jitter_min, d.jitter_max)?;

        let r = &self.rewards;
        check_band("reward jitter", r.jitter_min, r.jitter_max)?;
        for (name, tiers) in [("experience", &r.experience_tiers), ("currency", &r.currency_tiers)] {
            if tiers.is_empty() {
                return Err(ConfigError::Invalid(format!("{name} tiers must not be empty")));
            }
            if tiers.windows(2).any(|w| w[0].start_level >= w[1].start_level) {
                return Err(ConfigError::Invalid(format!(
                    "{name} tiers must be sorted by start_level"
                )));
            }
        }

        let p = &self.progression;
        if p.max_level == 0 || p.xp_per_level == 0 {
            return Err(ConfigError::Invalid(
                "max_level and xp_per_level must be positive".to_string(),
            ));
        }
        if p.stat_growth < 1.0 {
            return Err(ConfigError::Invalid("stat_growth must be at least 1".to_string()));
        }
        if self.roster_size() == 0 {
            return Err(ConfigError::Invalid("max_roster_size must be positive".to_string()));
        }
        Ok(())
    }
}

fn check_band(name: &str, min: f32, max: f32) -> ConfigResult<()> {
    if min <= 0.0 || min > max {
        return Err(ConfigError::Invalid(format!(
            "{name} band [{min}, {max}] must be positive and ordered"
        )));
    }
    Ok(())
}
