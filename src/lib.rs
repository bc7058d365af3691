// In: src/lib.rs

//! Creature Battle Engine
//!
//! A turn-based, single-opponent battle state machine with element
//! effectiveness, item use, creature switching and post-battle progression.
//! The engine owns no storage: it reads a roster snapshot and writes changes
//! back through [`RosterStore`].

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod creature;
pub mod errors;
pub mod items;
pub mod moves;
pub mod opponent;
pub mod progression;
pub mod roster;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{BaseStats, BoostStat, Effectiveness, Element, HealAmount, ItemEffect, MoveData};

// --- From this crate's modules (`src/`) ---

// Battle engine and its state.
pub use battle::calculators::{calculate_damage, DamageOutcome};
pub use battle::engine::{BattleEngine, BattleOutcome, FollowUp};
pub use battle::rng::TurnRng;
pub use battle::state::{BattleEvent, BattlePhase, BattleState, Outcome, Rewards, Side};

// Runtime data.
pub use config::BalanceConfig;
pub use creature::Creature;
pub use items::{apply_out_of_battle, EffectApplied, Item};
pub use opponent::OpponentDescriptor;
pub use progression::{apply_experience, LevelUpReport, RewardCalculator};
pub use roster::{CreaturePatch, Roster, RosterStore};

// Crate-specific error and result types.
pub use errors::{ActionError, BattleResult, ConfigError, ConfigResult, RosterError, RosterResult};
