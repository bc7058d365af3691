use crate::config::OpponentTuning;
use crate::creature::Creature;
use schema::{BaseStats, Element, MoveData};
use serde::{Deserialize, Serialize};

/// Everything the caller knows about an encounter before it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentDescriptor {
    pub name: String,
    pub element: Element,
    pub level: u8,
    #[serde(default)]
    pub is_boss: bool,
    /// Pre-set stats; derived from the level when absent.
    #[serde(default)]
    pub stats: Option<BaseStats>,
    #[serde(default)]
    pub primary_move: Option<MoveData>,
}

impl OpponentDescriptor {
    pub fn new(name: impl Into<String>, element: Element, level: u8) -> Self {
        OpponentDescriptor {
            name: name.into(),
            element,
            level,
            is_boss: false,
            stats: None,
            primary_move: None,
        }
    }

    pub fn boss(mut self) -> Self {
        self.is_boss = true;
        self
    }

    pub fn with_stats(mut self, stats: BaseStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_move(mut self, move_data: MoveData) -> Self {
        self.primary_move = Some(move_data);
        self
    }

    /// Build the ephemeral creature for this encounter. A level of 0 is treated as 1.
    pub fn build(&self, tuning: &OpponentTuning, max_level: u8) -> Creature {
        let level = self.level.clamp(1, max_level.max(1));
        let stats = self
            .stats
            .unwrap_or_else(|| derive_stats(level, self.is_boss, tuning));

        let mut creature = Creature::new(
            format!("opponent-{}", self.name.to_lowercase().replace(' ', "-")),
            self.name.clone(),
            self.element,
            level,
            stats,
        );
        creature.primary_move = self.primary_move.clone();
        creature
    }
}

/// Stats for an opponent with no pre-set values.
pub fn derive_stats(level: u8, is_boss: bool, tuning: &OpponentTuning) -> BaseStats {
    let scale = if is_boss { tuning.boss_stat_multiplier } else { 1.0 };
    let level = level.max(1) as f32;
    let stat = |base: f32, per_level: f32| -> u16 {
        ((base + per_level * level) * scale).round().clamp(1.0, u16::MAX as f32) as u16
    };

    BaseStats {
        max_hp: stat(tuning.hp_base, tuning.hp_per_level),
        attack: stat(tuning.stat_base, tuning.stat_per_level),
        defense: stat(tuning.stat_base, tuning.stat_per_level),
        speed: stat(tuning.stat_base, tuning.stat_per_level),
    }
}
