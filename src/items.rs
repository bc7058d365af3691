use crate::config::ProgressionTuning;
use crate::creature::Creature;
use crate::errors::{ActionError, BattleResult};
use schema::{BoostStat, HealAmount, ItemEffect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub effect: ItemEffect,
    pub quantity: u32,
    pub usable_in_battle: bool,
    pub price: u32,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, effect: ItemEffect, quantity: u32) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            effect,
            quantity,
            usable_in_battle: !matches!(effect, ItemEffect::LevelUp { .. }),
            price: 0,
        }
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// What an item did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectApplied {
    Healed { amount: u16 },
    Revived { hp: u16 },
    Boosted { stat: BoostStat, multiplier: f32 },
    Cured,
    LeveledUp { from: u8, to: u8 },
}

/// Apply `effect` to `target`. Effects that would do nothing are refused and leave the target untouched.
pub fn apply_effect(
    item_name: &str,
    effect: ItemEffect,
    target: &mut Creature,
    progression: &ProgressionTuning,
) -> BattleResult<EffectApplied> {
    let target_name = target.name.clone();
    let no_effect = || ActionError::NoEffect {
        item: item_name.to_string(),
        target: target_name.clone(),
    };

    if target.is_fainted() && !effect.targets_fainted() {
        return Err(ActionError::CreatureFainted(target_name.clone()));
    }

    match effect {
        ItemEffect::Heal(amount) => {
            if target.is_full_hp() {
                return Err(no_effect());
            }
            let amount = match amount {
                HealAmount::Flat(hp) => hp,
                HealAmount::Fraction(fraction) => fraction_of(target.max_hp(), fraction),
            };
            let healed = target.heal(amount.max(1));
            Ok(EffectApplied::Healed { amount: healed })
        }
        ItemEffect::FullHeal => {
            if target.is_full_hp() {
                return Err(no_effect());
            }
            let healed = target.heal(target.max_hp());
            Ok(EffectApplied::Healed { amount: healed })
        }
        ItemEffect::Revive { fraction } => {
            if !target.is_fainted() {
                return Err(no_effect());
            }
            target.set_hp(fraction_of(target.max_hp(), fraction).max(1));
            Ok(EffectApplied::Revived {
                hp: target.current_hp(),
            })
        }
        ItemEffect::StatusCure => Ok(EffectApplied::Cured),
        ItemEffect::StatBoost { stat, multiplier } => {
            if multiplier <= 1.0 {
                return Err(no_effect());
            }
            target.add_boost(stat, multiplier);
            Ok(EffectApplied::Boosted { stat, multiplier })
        }
        ItemEffect::LevelUp { levels } => {
            let from = target.level;
            if levels == 0 || from >= progression.max_level {
                return Err(no_effect());
            }
            let to = from.saturating_add(levels).min(progression.max_level);
            for _ in from..to {
                target.apply_level_up(progression.stat_growth);
            }
            target.experience = 0;
            Ok(EffectApplied::LeveledUp { from, to })
        }
    }
}

/// Use an item from the roster screen. Battle-only effects are refused.
pub fn apply_out_of_battle(
    item: &mut Item,
    target: &mut Creature,
    progression: &ProgressionTuning,
) -> BattleResult<EffectApplied> {
    if !item.in_stock() {
        return Err(ActionError::OutOfStock(item.name.clone()));
    }
    if matches!(item.effect, ItemEffect::StatBoost { .. } | ItemEffect::StatusCure) {
        return Err(ActionError::NoEffect {
            item: item.name.clone(),
            target: target.name.clone(),
        });
    }

    let applied = apply_effect(&item.name, item.effect, target, progression)?;
    item.quantity -= 1;
    tracing::debug!(item = %item.id, target = %target.id, ?applied, "Item used outside battle");
    Ok(applied)
}

fn fraction_of(max_hp: u16, fraction: f32) -> u16 {
    (max_hp as f32 * fraction.clamp(0.0, 1.0)).floor() as u16
}
