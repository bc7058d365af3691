use crate::battle::state::BattlePhase;
use thiserror::Error;

/// Why a battle action was refused. Refusals never change battle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action is not legal in the current phase
    #[error("{action} is not allowed during {phase:?}")]
    NotAllowed {
        action: &'static str,
        phase: BattlePhase,
    },
    /// No creature with this id is in the roster snapshot
    #[error("Unknown creature: {0}")]
    UnknownCreature(String),
    /// The chosen creature has fainted
    #[error("{0} has fainted and cannot battle")]
    CreatureFainted(String),
    /// The chosen creature is already on the field
    #[error("{0} is already in battle")]
    AlreadyActive(String),
    /// Every creature in the roster has fainted
    #[error("No creature is able to battle")]
    NoUsableCreature,
    /// No item with this id is in the inventory snapshot
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    /// The item has no remaining quantity
    #[error("No {0} left")]
    OutOfStock(String),
    /// The item cannot be used mid-battle
    #[error("{0} can't be used in battle")]
    NotUsableInBattle(String),
    /// The item would have no effect on its target
    #[error("{item} would have no effect on {target}")]
    NoEffect { item: String, target: String },
}

/// Errors raised while loading or validating balance configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Errors raised by the in-memory roster when loading or editing it outside a battle.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Roster is full ({0} creatures)")]
    Full(usize),
    #[error("Duplicate creature id: {0}")]
    DuplicateCreature(String),
    #[error("Failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse roster: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Type alias for Results of battle actions
pub type BattleResult<T> = Result<T, ActionError>;

/// Type alias for Results of configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Type alias for Results of roster operations
pub type RosterResult<T> = Result<T, RosterError>;
