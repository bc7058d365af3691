use crate::battle::engine::BattleEngine;
use crate::battle::rng::TurnRng;
use crate::config::BalanceConfig;
use crate::creature::Creature;
use crate::errors::BattleResult;
use crate::items::Item;
use crate::opponent::OpponentDescriptor;
use crate::roster::Roster;
use schema::{BaseStats, Element, HealAmount, ItemEffect, MoveData};

/// A builder for test creatures with common defaults.
///
/// # Example
/// ```ignore
/// let sprout = TestCreatureBuilder::new("sprout", Element::Grass, 5)
///     .with_hp(30)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    id: String,
    element: Element,
    level: u8,
    stats: BaseStats,
    current_hp: Option<u16>,
    experience: u32,
    primary_move: Option<MoveData>,
}

impl TestCreatureBuilder {
    /// Level-appropriate defaults: 50 HP, 20 attack, 10 defense, 10 speed.
    pub fn new(id: &str, element: Element, level: u8) -> Self {
        Self {
            id: id.to_string(),
            element,
            level,
            stats: BaseStats { max_hp: 50, attack: 20, defense: 10, speed: 10 },
            current_hp: None,
            experience: 0,
            primary_move: None,
        }
    }

    pub fn with_stats(mut self, stats: BaseStats) -> Self {
        self.stats = stats;
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_move(mut self, move_data: MoveData) -> Self {
        self.primary_move = Some(move_data);
        self
    }

    pub fn build(self) -> Creature {
        let name = capitalize(&self.id);
        let mut creature = Creature::new(self.id, name, self.element, self.level, self.stats);
        creature.experience = self.experience;
        creature.primary_move = self.primary_move;
        if let Some(hp) = self.current_hp {
            creature.set_hp(hp);
        }
        creature
    }
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn potion(quantity: u32) -> Item {
    Item::new("potion", "Potion", ItemEffect::Heal(HealAmount::Flat(20)), quantity)
}

pub fn rare_candy(quantity: u32) -> Item {
    Item::new("rare-candy", "Rare Candy", ItemEffect::LevelUp { levels: 1 }, quantity)
}

/// A roster holding `creatures`, 3 Potions, 1 Rare Candy and 100 coins.
pub fn create_test_roster(creatures: Vec<Creature>) -> Roster {
    let mut roster = Roster::new(6);
    for creature in creatures {
        if let Err(err) = roster.add_creature(creature) {
            panic!("Failed to build test roster: {}", err);
        }
    }
    roster.add_item(potion(3));
    roster.add_item(rare_candy(1));
    roster.currency = 100;
    roster
}

/// A level-5 normal opponent that goes down to one 10-damage hit.
pub fn fragile_opponent() -> OpponentDescriptor {
    OpponentDescriptor::new("Test Pup", Element::Normal, 5)
        .with_stats(BaseStats { max_hp: 10, attack: 10, defense: 10, speed: 10 })
}

/// A level-5 normal opponent that survives many hits and hits for 11.
pub fn sturdy_opponent() -> OpponentDescriptor {
    OpponentDescriptor::new("Test Golem", Element::Normal, 5)
        .with_stats(BaseStats { max_hp: 200, attack: 20, defense: 10, speed: 10 })
}

/// Creates a `TurnRng` with a long list of middle rolls: no critical hits, near-neutral jitter.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

pub fn create_test_engine() -> BattleEngine {
    BattleEngine::new(BalanceConfig::default(), predictable_rng())
}

/// Start a battle against `opponent` and send out `lead`, leaving the engine in `PlayerTurn`.
pub fn start_in_player_turn(
    engine: &mut BattleEngine,
    roster: &Roster,
    opponent: &OpponentDescriptor,
    lead: &str,
) {
    assert_ok(engine.start_battle(roster, opponent));
    assert_ok(engine.select_creature(lead));
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
