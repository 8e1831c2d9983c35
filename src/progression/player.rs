//! Player state and progression

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::config::GameConfig;
use crate::core::types::MissionId;

/// Kinds of items the player can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Tool,
    Module,
    Consumable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

/// An inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub rarity: Rarity,
    pub description: String,
}

impl Item {
    fn new(id: &str, name: &str, kind: ItemKind, rarity: Rarity, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            rarity,
            description: description.to_string(),
        }
    }
}

/// Every new operative starts with this kit
pub fn starter_inventory() -> Vec<Item> {
    vec![
        Item::new(
            "basic-decryptor",
            "Basic Decryptor",
            ItemKind::Tool,
            Rarity::Common,
            "A simple decryption tool for breaking weak encryption.",
        ),
        Item::new(
            "stealth-module-v1",
            "Stealth Module v1",
            ItemKind::Module,
            Rarity::Uncommon,
            "Reduces trace detection by 15%.",
        ),
        Item::new(
            "neural-booster",
            "Neural Booster",
            ItemKind::Consumable,
            Rarity::Rare,
            "Temporarily increases hacking speed by 25% for 10 minutes.",
        ),
    ]
}

/// The persistent player record
///
/// Invariant: `xp < xp_to_next_level` after every mutation made through
/// [`Progression`]. Direct field writes can break it; `repair_consistency`
/// puts it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub credits: u64,
    pub reputation: u64,
    pub skills: BTreeSet<String>,
    pub inventory: Vec<Item>,
    pub completed_missions: BTreeSet<MissionId>,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: config.base_xp_to_next_level,
            credits: config.starting_credits,
            reputation: 0,
            skills: BTreeSet::new(),
            inventory: starter_inventory(),
            completed_missions: BTreeSet::new(),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.level >= 1 && self.xp_to_next_level > 0 && self.xp < self.xp_to_next_level
    }
}

/// Leveling curve parameters, taken from the game config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelCurve {
    pub base_threshold: u64,
    pub growth_factor: f64,
    pub starting_credits: u64,
}

impl LevelCurve {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            base_threshold: config.base_xp_to_next_level,
            growth_factor: config.xp_growth_factor,
            starting_credits: config.starting_credits,
        }
    }

    /// Threshold for the level after the one `threshold` belongs to
    pub fn next_threshold(&self, threshold: u64) -> u64 {
        ((threshold as f64 * self.growth_factor).floor() as u64).max(1)
    }

    /// Total XP needed to reach the start of `level`
    pub fn xp_to_reach(&self, level: u32) -> u64 {
        let mut total = 0u64;
        let mut threshold = self.base_threshold;
        for _ in 1..level {
            total = total.saturating_add(threshold);
            threshold = self.next_threshold(threshold);
        }
        total
    }
}

/// Outcome of an XP grant, carrying both sides for narration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGain {
    pub amount: u64,
    pub level_before: u32,
    pub xp_before: u64,
    pub threshold_before: u64,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub leveled_up: bool,
    pub levels_gained: u32,
}

impl XpGain {
    /// "Level 1 → 2, XP 40/100 → 15/150" style summary
    pub fn describe(&self) -> String {
        if self.leveled_up {
            format!(
                "Level {} → {} | XP {}/{} → {}/{}",
                self.level_before,
                self.level,
                self.xp_before,
                self.threshold_before,
                self.xp,
                self.xp_to_next_level
            )
        } else {
            format!(
                "XP {}/{} → {}/{}",
                self.xp_before, self.threshold_before, self.xp, self.xp_to_next_level
            )
        }
    }
}

/// Before/after pair for an additive currency grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub before: u64,
    pub after: u64,
}

/// The progression model: sole mutator of the player record
#[derive(Debug, Clone)]
pub struct Progression {
    player: Player,
    curve: LevelCurve,
}

impl Progression {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            player: Player::new(config),
            curve: LevelCurve::from_config(config),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// Add XP and level up as many times as the total allows
    pub fn add_xp(&mut self, amount: u64) -> XpGain {
        let p = &mut self.player;
        let level_before = p.level;
        let xp_before = p.xp;
        let threshold_before = p.xp_to_next_level;

        p.xp = p.xp.saturating_add(amount);
        let mut levels_gained = 0;
        while p.xp >= p.xp_to_next_level {
            p.xp -= p.xp_to_next_level;
            p.level += 1;
            p.xp_to_next_level = self.curve.next_threshold(p.xp_to_next_level);
            levels_gained += 1;
        }

        if levels_gained > 0 {
            tracing::info!(
                "Level up: {} -> {} ({} level(s))",
                level_before,
                p.level,
                levels_gained
            );
        }

        XpGain {
            amount,
            level_before,
            xp_before,
            threshold_before,
            level: p.level,
            xp: p.xp,
            xp_to_next_level: p.xp_to_next_level,
            leveled_up: levels_gained > 0,
            levels_gained,
        }
    }

    pub fn grant_credits(&mut self, amount: u64) -> Grant {
        let before = self.player.credits;
        self.player.credits = before.saturating_add(amount);
        Grant {
            before,
            after: self.player.credits,
        }
    }

    pub fn grant_reputation(&mut self, amount: u64) -> Grant {
        let before = self.player.reputation;
        self.player.reputation = before.saturating_add(amount);
        Grant {
            before,
            after: self.player.reputation,
        }
    }

    pub fn add_skill(&mut self, skill: impl Into<String>) -> bool {
        self.player.skills.insert(skill.into())
    }

    pub fn record_completed_mission(&mut self, id: MissionId) {
        self.player.completed_missions.insert(id);
    }

    /// Lifetime XP implied by the current level and xp
    pub fn lifetime_xp(&self) -> u64 {
        self.curve
            .xp_to_reach(self.player.level.max(1))
            .saturating_add(self.player.xp)
    }

    /// Recompute level, xp and threshold from lifetime XP, replaying the curve
    /// from level 1. Idempotent.
    pub fn repair_consistency(&mut self) -> XpGain {
        let total = self.lifetime_xp();
        let before = self.player.clone();

        self.player.level = 1;
        self.player.xp = 0;
        self.player.xp_to_next_level = self.curve.base_threshold;
        let replay = self.add_xp(total);

        if before.level != self.player.level || before.xp_to_next_level != self.player.xp_to_next_level {
            tracing::info!(
                "Repaired progression: level {} -> {}, threshold {} -> {}",
                before.level,
                self.player.level,
                before.xp_to_next_level,
                self.player.xp_to_next_level
            );
        }

        XpGain {
            amount: total,
            level_before: before.level,
            xp_before: before.xp,
            threshold_before: before.xp_to_next_level,
            ..replay
        }
    }

    /// Back to level 1 with starting credits. Skills, inventory and the
    /// completed-mission set are kept.
    pub fn reset(&mut self) {
        self.player.level = 1;
        self.player.xp = 0;
        self.player.xp_to_next_level = self.curve.base_threshold;
        self.player.credits = self.curve.starting_credits;
        self.player.reputation = 0;
        tracing::info!("Player stats reset");
    }

    /// Brand-new player, starter kit included
    pub fn reset_all(&mut self) {
        let skills_cleared = self.player.skills.len();
        self.player = Player {
            level: 1,
            xp: 0,
            xp_to_next_level: self.curve.base_threshold,
            credits: self.curve.starting_credits,
            reputation: 0,
            skills: BTreeSet::new(),
            inventory: starter_inventory(),
            completed_missions: BTreeSet::new(),
        };
        tracing::info!("Player wiped ({} skill(s) cleared)", skills_cleared);
    }

    pub fn snapshot(&self) -> Player {
        self.player.clone()
    }

    pub fn restore(&mut self, player: Player) {
        self.player = player;
    }

    /// Raw access for debugging and tests; may break the xp invariant
    pub fn player_mut_unchecked(&mut self) -> &mut Player {
        &mut self.player
    }
}
