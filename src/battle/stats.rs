use crate::creature::Creature;
use schema::BoostStat;

/// Attack including battle-scoped boosts
pub fn effective_attack(creature: &Creature) -> u16 {
    apply_boost(creature.stats.attack, creature.boost(BoostStat::Attack))
}

/// Defense including battle-scoped boosts, never below 1
pub fn effective_defense(creature: &Creature) -> u16 {
    apply_boost(creature.stats.defense, creature.boost(BoostStat::Defense)).max(1)
}

fn apply_boost(base_stat: u16, multiplier: f32) -> u16 {
    if multiplier == 1.0 {
        return base_stat;
    }
    ((base_stat as f32) * multiplier)
        .round()
        .clamp(0.0, u16::MAX as f32) as u16
}
