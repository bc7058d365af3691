use crate::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
}

impl BaseStats {
    /// Every stat floored at 1, so ratios and divisions stay defined.
    pub fn sanitized(self) -> BaseStats {
        BaseStats {
            max_hp: self.max_hp.max(1),
            attack: self.attack.max(1),
            defense: self.defense.max(1),
            speed: self.speed.max(1),
        }
    }
}

/// The single damaging move a creature uses in battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub element: Element,
    pub power: u16,
}

impl MoveData {
    pub fn new(name: impl Into<String>, element: Element, power: u16) -> Self {
        Self {
            name: name.into(),
            element,
            power,
        }
    }
}

/// Stats that can carry a battle-scoped boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoostStat {
    Attack,
    Defense,
}

impl fmt::Display for BoostStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoostStat::Attack => write!(f, "Attack"),
            BoostStat::Defense => write!(f, "Defense"),
        }
    }
}
