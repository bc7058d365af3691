use crate::creature::Creature;
use crate::items::{EffectApplied, Item};
use schema::{Effectiveness, MoveData};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattlePhase {
    Idle,
    Starting,
    SelectCreature,
    PlayerTurn,
    UsingItem,      // Sub-phase of PlayerTurn while an item resolves
    Attacking,      // Player move announced, damage pending
    EnemyTurn,      // Opponent counter-attack pending
    ChangingCreature, // Active creature fainted, a replacement must be chosen
    Victory,
    Defeat,
    Fleeing,
}

impl BattlePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat | BattlePhase::Fleeing)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
    Fled,
}

/// Rewards fixed at the moment of victory, applied by `end_battle`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rewards {
    pub experience: u32,
    pub currency: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    Encounter {
        opponent: String,
        level: u8,
        is_boss: bool,
    },
    CreatureSentOut {
        creature: String,
    },
    CreatureSwitched {
        old_creature: String,
        new_creature: String,
    },
    MoveUsed {
        side: Side,
        creature: String,
        move_name: String,
    },
    CriticalHit,
    AttackEffectiveness {
        effectiveness: Effectiveness,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    CreatureFainted {
        side: Side,
        creature: String,
    },
    ItemUsed {
        item: String,
        target: String,
        applied: EffectApplied,
    },
    ItemRejected {
        item: String,
        reason: String,
    },
    ExperienceGained {
        amount: u32,
    },
    CurrencyGained {
        amount: u32,
    },
    OutOfCreatures,
    Fled,
}

impl BattleEvent {
    /// Formats the event into a log line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::Encounter { opponent, level, is_boss } => Some(if *is_boss {
                format!("The boss {} (Lv. {}) blocks the way!", opponent, level)
            } else {
                format!("A wild {} (Lv. {}) appeared!", opponent, level)
            }),
            BattleEvent::CreatureSentOut { creature } => Some(format!("Go, {}!", creature)),
            BattleEvent::CreatureSwitched { old_creature, new_creature } => Some(format!(
                "{}, come back! Go, {}!",
                old_creature, new_creature
            )),
            BattleEvent::MoveUsed { side, creature, move_name } => Some(match side {
                Side::Player => format!("{} used {}!", creature, move_name),
                Side::Enemy => format!("The opposing {} used {}!", creature, move_name),
            }),
            BattleEvent::CriticalHit => Some("A critical hit!".to_string()),
            BattleEvent::AttackEffectiveness { effectiveness } => match effectiveness {
                Effectiveness::SuperEffective => Some("It's super effective!".to_string()),
                Effectiveness::NotVeryEffective => Some("It's not very effective...".to_string()),
                Effectiveness::NoEffect => Some("It had no effect!".to_string()),
                Effectiveness::Normal => None,
            },
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::CreatureFainted { creature, .. } => Some(format!("{} fainted!", creature)),
            BattleEvent::ItemUsed { item, target, applied } => Some(match applied {
                EffectApplied::Healed { amount } => {
                    format!("Used {}! {} recovered {} HP!", item, target, amount)
                }
                EffectApplied::Revived { .. } => format!("Used {}! {} was revived!", item, target),
                EffectApplied::Boosted { stat, .. } => {
                    format!("Used {}! {}'s {} rose!", item, target, stat)
                }
                EffectApplied::Cured => format!("Used {}! {} feels refreshed.", item, target),
                EffectApplied::LeveledUp { to, .. } => {
                    format!("Used {}! {} grew to Lv. {}!", item, target, to)
                }
            }),
            BattleEvent::ItemRejected { reason, .. } => Some(reason.clone()),
            BattleEvent::ExperienceGained { amount } => Some(format!("Gained {} XP!", amount)),
            BattleEvent::CurrencyGained { amount } => Some(format!("Found {} coins!", amount)),
            BattleEvent::OutOfCreatures => {
                Some("You have no creatures left that can fight!".to_string())
            }
            BattleEvent::Fled => Some("Got away safely!".to_string()),
        }
    }
}

/// Everything about the battle in progress. Created by `start_battle`, dropped by `end_battle`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: u64,
    pub phase: BattlePhase,
    pub turn_number: u32,
    /// Bumped each time a follow-up is scheduled.
    pub step: u64,
    pub opponent: Creature,
    pub opponent_is_boss: bool,
    /// Roster snapshot taken at battle start; HP changes land here first.
    pub roster: Vec<Creature>,
    pub active_index: Option<usize>,
    pub items: Vec<Item>,
    pub log: Vec<String>,
    pub events: Vec<BattleEvent>,
    pub pending_move: Option<MoveData>,
    pub active_item: Option<String>,
    pub rewards: Option<Rewards>,
}

impl BattleState {
    pub fn new(battle_id: u64, opponent: Creature, opponent_is_boss: bool, roster: Vec<Creature>, items: Vec<Item>) -> Self {
        Self {
            battle_id,
            phase: BattlePhase::Starting,
            turn_number: 0,
            step: 0,
            opponent,
            opponent_is_boss,
            roster,
            active_index: None,
            items,
            log: Vec::new(),
            events: Vec::new(),
            pending_move: None,
            active_item: None,
            rewards: None,
        }
    }

    /// Record an event and its log line, if it has one.
    pub fn record(&mut self, event: BattleEvent) {
        if let Some(line) = event.format() {
            self.log.push(line);
        }
        self.events.push(event);
    }

    pub fn active_creature(&self) -> Option<&Creature> {
        self.active_index.and_then(|index| self.roster.get(index))
    }

    pub fn active_creature_mut(&mut self) -> Option<&mut Creature> {
        self.active_index.and_then(|index| self.roster.get_mut(index))
    }

    pub fn creature_index(&self, id: &str) -> Option<usize> {
        self.roster.iter().position(|c| c.id == id)
    }

    pub fn item_index(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    pub fn all_fainted(&self) -> bool {
        self.roster.iter().all(Creature::is_fainted)
    }

    /// Who owns the turn; only defined in `PlayerTurn` and `EnemyTurn`.
    pub fn turn_owner(&self) -> Option<Side> {
        match self.phase {
            BattlePhase::PlayerTurn | BattlePhase::UsingItem => Some(Side::Player),
            BattlePhase::EnemyTurn => Some(Side::Enemy),
            _ => None,
        }
    }
}
