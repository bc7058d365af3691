// Creature Battle Schema - Shared type definitions
// This crate holds the closed enumerations and plain records shared by the
// battle engine and anything that persists or renders its data.

pub use creature_data::*;
pub use element::*;
pub use items::*;

pub mod creature_data;
pub mod element;
pub mod items;
