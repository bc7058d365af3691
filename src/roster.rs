//! The player's persistent collection and the boundary the battle engine writes through.
//!
//! The engine reads a snapshot at battle start and proposes every change through
//! [`RosterStore`]; it never holds on to the caller's storage.

use crate::config::DEFAULT_ROSTER_SIZE;
use crate::creature::Creature;
use crate::errors::{RosterError, RosterResult};
use crate::items::Item;
use schema::BaseStats;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Partial update for a stored creature. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreaturePatch {
    pub current_hp: Option<u16>,
    pub level: Option<u8>,
    pub experience: Option<u32>,
    pub stats: Option<BaseStats>,
}

impl CreaturePatch {
    pub fn hp(current_hp: u16) -> Self {
        CreaturePatch {
            current_hp: Some(current_hp),
            ..Default::default()
        }
    }

    /// Everything progression can change on a creature.
    pub fn progression(creature: &Creature) -> Self {
        CreaturePatch {
            current_hp: Some(creature.current_hp()),
            level: Some(creature.level),
            experience: Some(creature.experience),
            stats: Some(creature.stats),
        }
    }

    pub fn apply_to(&self, creature: &mut Creature) {
        if let Some(stats) = self.stats {
            creature.stats = stats.sanitized();
        }
        if let Some(level) = self.level {
            creature.level = level.max(1);
        }
        if let Some(experience) = self.experience {
            creature.experience = experience;
        }
        match self.current_hp {
            Some(hp) => creature.set_hp(hp),
            // Re-clamp in case max HP shrank.
            None => creature.set_hp(creature.current_hp()),
        }
    }
}

/// Read/update callbacks into the caller-owned roster.
pub trait RosterStore {
    fn creatures(&self) -> Vec<Creature>;
    fn items(&self) -> Vec<Item>;
    fn currency(&self) -> u64;

    fn update_creature_stats(&mut self, id: &str, patch: CreaturePatch);
    /// Adjust the balance; the result never drops below zero.
    fn update_currency(&mut self, delta: i64);
    /// Adjust an item's quantity; the result never drops below zero.
    fn update_item_quantity(&mut self, id: &str, delta: i32);
}

/// In-memory roster, the default [`RosterStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub creatures: Vec<Creature>,
    pub currency: u64,
    pub items: Vec<Item>,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_ROSTER_SIZE
}

impl Roster {
    pub fn new(capacity: usize) -> Self {
        Roster {
            capacity,
            ..Default::default()
        }
    }

    pub fn add_creature(&mut self, creature: Creature) -> RosterResult<()> {
        if self.creatures.len() >= self.capacity {
            return Err(RosterError::Full(self.capacity));
        }
        if self.creatures.iter().any(|c| c.id == creature.id) {
            return Err(RosterError::DuplicateCreature(creature.id));
        }
        self.creatures.push(creature);
        Ok(())
    }

    pub fn add_item(&mut self, item: Item) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    pub fn creature(&self, id: &str) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn from_json(source: &str) -> RosterResult<Self> {
        let mut roster: Roster = serde_json::from_str(source)?;
        if roster.capacity == 0 {
            roster.capacity = DEFAULT_ROSTER_SIZE;
        }
        if roster.creatures.len() > roster.capacity {
            return Err(RosterError::Full(roster.capacity));
        }
        // Stored HP may exceed max HP in hand-edited files.
        for creature in &mut roster.creatures {
            creature.set_hp(creature.current_hp());
        }
        Ok(roster)
    }

    pub fn load(path: &Path) -> RosterResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> RosterResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl RosterStore for Roster {
    fn creatures(&self) -> Vec<Creature> {
        self.creatures.clone()
    }

    fn items(&self) -> Vec<Item> {
        self.items.clone()
    }

    fn currency(&self) -> u64 {
        self.currency
    }

    fn update_creature_stats(&mut self, id: &str, patch: CreaturePatch) {
        match self.creatures.iter_mut().find(|c| c.id == id) {
            Some(creature) => patch.apply_to(creature),
            None => tracing::warn!(id, "Ignoring patch for unknown creature"),
        }
    }

    fn update_currency(&mut self, delta: i64) {
        self.currency = if delta >= 0 {
            self.currency.saturating_add(delta as u64)
        } else {
            self.currency.saturating_sub(delta.unsigned_abs())
        };
    }

    fn update_item_quantity(&mut self, id: &str, delta: i32) {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.quantity = if delta >= 0 {
                    item.quantity.saturating_add(delta as u32)
                } else {
                    item.quantity.saturating_sub(delta.unsigned_abs())
                };
            }
            None => tracing::warn!(id, "Ignoring quantity change for unknown item"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{Element, HealAmount, ItemEffect};

    fn creature(id: &str) -> Creature {
        Creature::new(
            id,
            id.to_uppercase(),
            Element::Water,
            3,
            BaseStats { max_hp: 30, attack: 10, defense: 10, speed: 10 },
        )
    }

    #[test]
    fn test_capacity_and_duplicates() {
        let mut roster = Roster::new(2);
        roster.add_creature(creature("a")).unwrap();
        assert!(matches!(
            roster.add_creature(creature("a")),
            Err(RosterError::DuplicateCreature(_))
        ));
        roster.add_creature(creature("b")).unwrap();
        assert!(matches!(roster.add_creature(creature("c")), Err(RosterError::Full(2))));
    }

    #[test]
    fn test_currency_never_negative() {
        let mut roster = Roster::new(6);
        roster.update_currency(50);
        roster.update_currency(-80);
        assert_eq!(roster.currency, 0);
        roster.update_currency(i64::MAX);
        roster.update_currency(i64::MAX);
        assert!(roster.currency > i64::MAX as u64, "no upper cap");
    }

    #[test]
    fn test_patch_applies_by_id() {
        let mut roster = Roster::new(6);
        roster.add_creature(creature("a")).unwrap();
        roster.add_creature(creature("b")).unwrap();

        roster.update_creature_stats("b", CreaturePatch::hp(7));
        roster.update_creature_stats("missing", CreaturePatch::hp(1));

        assert_eq!(roster.creature("a").unwrap().current_hp(), 30);
        assert_eq!(roster.creature("b").unwrap().current_hp(), 7);
    }

    #[test]
    fn test_item_quantity_floor() {
        let mut roster = Roster::new(6);
        roster.add_item(Item::new("potion", "Potion", ItemEffect::Heal(HealAmount::Flat(20)), 1));
        roster.add_item(Item::new("potion", "Potion", ItemEffect::Heal(HealAmount::Flat(20)), 2));
        assert_eq!(roster.item("potion").unwrap().quantity, 3);

        roster.update_item_quantity("potion", -5);
        assert_eq!(roster.item("potion").unwrap().quantity, 0);
    }

    #[test]
    fn test_json_snapshot_clamps_hp() {
        let mut roster = Roster::new(6);
        roster.add_creature(creature("a")).unwrap();
        let json = roster.to_json().unwrap().replace("\"current_hp\": 30", "\"current_hp\": 99");

        let loaded = Roster::from_json(&json).unwrap();
        assert_eq!(loaded.creature("a").unwrap().current_hp(), 30);
    }
}
