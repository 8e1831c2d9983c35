//! Player progression: level, XP, credits, reputation

pub mod player;

pub use player::{Grant, Item, LevelCurve, Player, Progression, XpGain};
