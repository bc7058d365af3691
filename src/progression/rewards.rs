use crate::battle::rng::TurnRng;
use crate::battle::state::Rewards;
use crate::config::{RewardTier, RewardTuning};

/// Calculator for experience and currency yielded by a defeated opponent
pub struct RewardCalculator<'a> {
    tuning: &'a RewardTuning,
}

impl<'a> RewardCalculator<'a> {
    pub fn new(tuning: &'a RewardTuning) -> Self {
        Self { tuning }
    }

    /// Experience before jitter: tiered linear curve, scaled for bosses
    pub fn base_experience(&self, level: u8, is_boss: bool) -> f32 {
        let boss = if is_boss { self.tuning.boss_experience_multiplier } else { 1.0 };
        tiered_value(level, &self.tuning.experience_tiers) * boss
    }

    /// Currency before jitter, same shape with its own tiers
    pub fn base_currency(&self, level: u8, is_boss: bool) -> f32 {
        let boss = if is_boss { self.tuning.boss_currency_multiplier } else { 1.0 };
        tiered_value(level, &self.tuning.currency_tiers) * boss
    }

    pub fn experience_for(&self, level: u8, is_boss: bool, rng: &mut TurnRng) -> u32 {
        let jitter = rng.next_in_band(self.tuning.jitter_min, self.tuning.jitter_max, "experience jitter");
        to_reward(self.base_experience(level, is_boss) * jitter)
    }

    pub fn currency_for(&self, level: u8, is_boss: bool, rng: &mut TurnRng) -> u32 {
        let jitter = rng.next_in_band(self.tuning.jitter_min, self.tuning.jitter_max, "currency jitter");
        to_reward(self.base_currency(level, is_boss) * jitter)
    }

    /// Both rewards; experience is rolled first.
    pub fn rewards_for(&self, level: u8, is_boss: bool, rng: &mut TurnRng) -> Rewards {
        let experience = self.experience_for(level, is_boss, rng);
        let currency = self.currency_for(level, is_boss, rng);
        Rewards { experience, currency }
    }
}

/// Value of the highest tier whose `start_level` is below `level`.
fn tiered_value(level: u8, tiers: &[RewardTier]) -> f32 {
    let level = level.max(1);
    tiers
        .iter()
        .rev()
        .find(|tier| tier.start_level < level)
        .or(tiers.first())
        .map(|tier| tier.base + tier.per_level * (level as f32 - tier.start_level as f32))
        .unwrap_or(0.0)
}

fn to_reward(value: f32) -> u32 {
    value.round().clamp(0.0, u32::MAX as f32) as u32
}
