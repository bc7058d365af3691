use schema::{BaseStats, BoostStat, Element, MoveData};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A battle participant: a roster member, or an opponent built for one encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: String,
    pub name: String,
    pub element: Element,
    pub level: u8,
    /// Experience towards the next level; resets on level-up.
    pub experience: u32,
    pub stats: BaseStats,
    current_hp: u16,
    /// Explicit move. When absent the battle derives one from element and level.
    #[serde(default)]
    pub primary_move: Option<MoveData>,
    /// Battle-scoped stat multipliers. Never persisted.
    #[serde(skip)]
    pub boosts: HashMap<BoostStat, f32>,
}

impl Creature {
    /// Create a creature at full HP.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element: Element,
        level: u8,
        stats: BaseStats,
    ) -> Self {
        let stats = stats.sanitized();
        Creature {
            id: id.into(),
            name: name.into(),
            element,
            level: level.max(1),
            experience: 0,
            current_hp: stats.max_hp,
            stats,
            primary_move: None,
            boosts: HashMap::new(),
        }
    }

    pub fn with_move(mut self, move_data: MoveData) -> Self {
        self.primary_move = Some(move_data);
        self
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_full_hp(&self) -> bool {
        self.current_hp >= self.stats.max_hp
    }

    /// Set HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.stats.max_hp);
    }

    pub fn set_hp_to_max(&mut self) {
        self.current_hp = self.stats.max_hp;
    }

    /// Apply damage, returns true if the creature fainted from it.
    pub fn take_damage(&mut self, damage: u16) -> bool {
        let was_conscious = !self.is_fainted();
        self.current_hp = self.current_hp.saturating_sub(damage);
        was_conscious && self.is_fainted()
    }

    /// Restore HP up to max, returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.current_hp;
        self.set_hp(self.current_hp.saturating_add(amount));
        self.current_hp - before
    }

    /// Record a battle-scoped boost. Repeated boosts on one stat stack multiplicatively.
    pub fn add_boost(&mut self, stat: BoostStat, multiplier: f32) {
        let entry = self.boosts.entry(stat).or_insert(1.0);
        *entry *= multiplier;
    }

    pub fn boost(&self, stat: BoostStat) -> f32 {
        self.boosts.get(&stat).copied().unwrap_or(1.0)
    }

    pub fn clear_boosts(&mut self) {
        self.boosts.clear();
    }

    /// Scale every base stat by `growth`, floored and never decreasing, and refill HP.
    pub fn apply_level_up(&mut self, growth: f32) {
        let grow = |stat: u16| -> u16 {
            let grown = (stat as f32 * growth).floor();
            (grown.min(u16::MAX as f32) as u16).max(stat)
        };
        self.level = self.level.saturating_add(1);
        self.stats = BaseStats {
            max_hp: grow(self.stats.max_hp),
            attack: grow(self.stats.attack),
            defense: grow(self.stats.defense),
            speed: grow(self.stats.speed),
        };
        self.set_hp_to_max();
    }
}
