//! Signature moves derived from a creature's element and level.
//!
//! Creatures without an explicit move fight with their element's signature
//! move. Power grows along a tiered curve so higher levels hit harder than a
//! straight line would give.

use schema::{Element, MoveData};

/// One row of the signature move table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureMove {
    pub name: &'static str,
    /// Stronger-sounding name used by opponents.
    pub opponent_name: &'static str,
    pub base_power: u16,
}

const fn sig(name: &'static str, opponent_name: &'static str, base_power: u16) -> SignatureMove {
    SignatureMove {
        name,
        opponent_name,
        base_power,
    }
}

pub fn signature_move(element: Element) -> SignatureMove {
    match element {
        Element::Normal => sig("Tackle", "Body Slam", 40),
        Element::Fire => sig("Ember", "Flamethrower", 40),
        Element::Water => sig("Water Gun", "Hydro Pump", 40),
        Element::Grass => sig("Vine Whip", "Razor Leaf", 45),
        Element::Electric => sig("Thunder Shock", "Thunderbolt", 40),
        Element::Ice => sig("Powder Snow", "Ice Beam", 40),
        Element::Fighting => sig("Karate Chop", "Cross Chop", 50),
        Element::Poison => sig("Poison Sting", "Sludge Bomb", 35),
        Element::Ground => sig("Mud-Slap", "Earthquake", 40),
        Element::Flying => sig("Gust", "Air Slash", 40),
        Element::Psychic => sig("Confusion", "Psybeam", 50),
        Element::Bug => sig("Bug Bite", "X-Scissor", 45),
        Element::Rock => sig("Rock Throw", "Rock Slide", 50),
        Element::Ghost => sig("Lick", "Shadow Ball", 35),
        Element::Dragon => sig("Dragon Breath", "Dragon Claw", 50),
        Element::Dark => sig("Bite", "Crunch", 50),
        Element::Steel => sig("Metal Claw", "Iron Head", 50),
        Element::Fairy => sig("Fairy Wind", "Moonblast", 40),
    }
}

/// Piecewise power multiplier; each tier has a steeper slope than the last.
pub fn level_power_multiplier(level: u8) -> f32 {
    let level = level.max(1) as f32;
    match level {
        l if l <= 10.0 => 1.0 + 0.02 * l,
        l if l <= 25.0 => 1.2 + 0.03 * (l - 10.0),
        l if l <= 40.0 => 1.65 + 0.04 * (l - 25.0),
        l => 2.25 + 0.05 * (l - 40.0),
    }
}

/// Build the default move for a creature of `element` at `level`.
/// `opponent_multiplier` is applied only when `is_opponent` is set.
pub fn default_move(element: Element, level: u8, is_opponent: bool, opponent_multiplier: f32) -> MoveData {
    let signature = signature_move(element);
    let mut power = signature.base_power as f32 * level_power_multiplier(level);
    let name = if is_opponent {
        power *= opponent_multiplier;
        signature.opponent_name
    } else {
        signature.name
    };

    MoveData::new(name, element, power.round().max(1.0) as u16)
}

/// Same as [`default_move`], for element names coming from untyped data.
pub fn default_move_for_name(
    element_name: &str,
    level: u8,
    is_opponent: bool,
    opponent_multiplier: f32,
) -> MoveData {
    default_move(
        Element::from_name_or_normal(element_name),
        level,
        is_opponent,
        opponent_multiplier,
    )
}
