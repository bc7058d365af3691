//! Folding battle rewards into persistent progression.

pub mod rewards;

pub use rewards::RewardCalculator;

use crate::battle::state::Rewards;
use crate::config::ProgressionTuning;
use crate::creature::Creature;
use crate::roster::{CreaturePatch, RosterStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub old_level: u8,
    pub new_level: u8,
    pub experience: u32,
}

impl LevelUpReport {
    pub fn levels_gained(&self) -> u8 {
        self.new_level.saturating_sub(self.old_level)
    }
}

/// Experience needed to leave `level`
pub fn xp_threshold(level: u8, tuning: &ProgressionTuning) -> u32 {
    level as u32 * tuning.xp_per_level
}

/// Add experience and resolve every level-up it pays for.
///
/// At the level cap the surplus is held just below the threshold.
pub fn apply_experience(creature: &mut Creature, amount: u32, tuning: &ProgressionTuning) -> LevelUpReport {
    let old_level = creature.level;
    creature.experience = creature.experience.saturating_add(amount);

    while creature.level < tuning.max_level {
        let threshold = xp_threshold(creature.level, tuning);
        if creature.experience < threshold {
            break;
        }
        creature.experience -= threshold;
        creature.apply_level_up(tuning.stat_growth);
        tracing::info!(creature = %creature.id, level = creature.level, "Level up");
    }

    if creature.level >= tuning.max_level {
        let cap = xp_threshold(creature.level, tuning).saturating_sub(1);
        creature.experience = creature.experience.min(cap);
    }

    LevelUpReport {
        old_level,
        new_level: creature.level,
        experience: creature.experience,
    }
}

/// Apply victory rewards to the surviving creature and write everything back through the store.
pub fn apply_victory<S: RosterStore + ?Sized>(
    store: &mut S,
    creature: &mut Creature,
    rewards: Rewards,
    tuning: &ProgressionTuning,
) -> LevelUpReport {
    let report = apply_experience(creature, rewards.experience, tuning);
    store.update_creature_stats(&creature.id, CreaturePatch::progression(creature));
    store.update_currency(rewards.currency as i64);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, Element};

    fn level_five() -> Creature {
        Creature::new(
            "c1",
            "Sprout",
            Element::Grass,
            5,
            BaseStats { max_hp: 50, attack: 20, defense: 10, speed: 10 },
        )
    }

    #[test]
    fn test_small_reward_stays_below_threshold() {
        let mut creature = level_five();
        let report = apply_experience(&mut creature, 250, &ProgressionTuning::default());

        assert_eq!(report.levels_gained(), 0);
        assert_eq!(creature.experience, 250);
        assert!(creature.experience < creature.level as u32 * 100);
    }

    #[test]
    fn test_single_level_up() {
        let mut creature = level_five();
        creature.set_hp(5);
        let report = apply_experience(&mut creature, 520, &ProgressionTuning::default());

        assert_eq!(report.new_level, 6);
        assert_eq!(creature.experience, 20);
        assert_eq!(creature.stats.max_hp, 55);
        assert_eq!(creature.current_hp(), 55);
    }

    #[test]
    fn test_cascading_level_ups() {
        let mut creature = level_five();
        // 500 to reach 6, 600 to reach 7, 50 left over
        let report = apply_experience(&mut creature, 1150, &ProgressionTuning::default());

        assert_eq!(report.old_level, 5);
        assert_eq!(report.new_level, 7);
        assert_eq!(report.levels_gained(), 2);
        assert_eq!(creature.experience, 50);
        assert!(creature.experience < creature.level as u32 * 100);
    }

    #[test]
    fn test_max_level_caps_experience() {
        let tuning = ProgressionTuning {
            max_level: 6,
            ..Default::default()
        };
        let mut creature = level_five();
        apply_experience(&mut creature, 5000, &tuning);

        assert_eq!(creature.level, 6);
        assert_eq!(creature.experience, 599);
    }

    #[test]
    fn test_victory_writes_back_by_id() {
        let mut roster = Roster::new(6);
        roster.add_creature(level_five()).unwrap();
        roster.currency = 10;

        let mut survivor = level_five();
        survivor.set_hp(12);
        let report = apply_victory(
            &mut roster,
            &mut survivor,
            Rewards { experience: 600, currency: 35 },
            &ProgressionTuning::default(),
        );

        assert_eq!(report.new_level, 6);
        let stored = roster.creature("c1").unwrap();
        assert_eq!(stored.level, 6);
        assert_eq!(stored.experience, 100);
        assert_eq!(stored.current_hp(), stored.max_hp());
        assert_eq!(roster.currency, 45);
    }
}
