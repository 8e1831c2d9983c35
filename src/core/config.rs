//! Game configuration with documented constants
//!
//! All tuning numbers for progression, odds and rewards live here so that
//! handlers never carry magic numbers of their own.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, RogueError};

/// Environment variable pointing at an optional TOML config file
pub const CONFIG_ENV_VAR: &str = "ROGUECODE_CONFIG";

/// Configuration for the command engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === PROGRESSION ===
    /// Credits a fresh player starts with (and returns to on `reset stats`)
    pub starting_credits: u64,

    /// XP needed to go from level 1 to level 2
    pub base_xp_to_next_level: u64,

    /// Threshold multiplier applied per level gained (result is floored)
    ///
    /// At 1.5 the thresholds run 100, 150, 225, 337, 505...
    pub xp_growth_factor: f64,

    // === ODDS ===
    /// Lower clamp for every probability-gated action
    ///
    /// Nothing is ever impossible: even the quietest hack against a
    /// hardened target keeps this much chance.
    pub min_success: f64,

    /// Upper clamp for every probability-gated action
    pub max_success: f64,

    /// Base chance for a scan to get a response from the target
    pub scan_base: f64,

    /// Base chance for a hack before flags and target security
    pub hack_base: f64,

    /// Added to hack odds when the target carries an injected payload
    pub injection_bonus: f64,

    /// `--stealth` trades success for a smaller footprint
    pub stealth_penalty: f64,

    /// `--force` trades footprint for success on scan and inject
    pub force_bonus: f64,

    /// `--bruteforce` on hack
    pub bruteforce_bonus: f64,

    /// `--quiet` on hack: slow and silent, nearly hopeless on its own
    ///
    /// Quiet successes pay double reputation.
    pub quiet_penalty: f64,

    /// `--deep` on scan probes more and gets dropped more often
    pub deep_scan_penalty: f64,

    // === REWARDS ===
    /// XP per target tier on a successful hack
    pub hack_xp_per_tier: u64,

    /// Credits per target tier on a successful hack
    pub hack_credits_per_tier: u64,

    /// Reputation per target tier on a successful hack
    pub hack_reputation_per_tier: u64,

    // === ENRICHMENT ===
    /// Hard limit on a single enrichment call before falling back to local text
    pub enrichment_timeout_ms: u64,

    // === SESSION ===
    /// Maximum entries kept in the session display log
    pub max_log_entries: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Progression
            starting_credits: 1000,
            base_xp_to_next_level: 100,
            xp_growth_factor: 1.5,

            // Odds
            min_success: 0.1,
            max_success: 0.95,
            scan_base: 0.85,
            hack_base: 0.6,
            injection_bonus: 0.2,
            stealth_penalty: 0.1,
            force_bonus: 0.15,
            bruteforce_bonus: 0.2,
            quiet_penalty: 0.6,
            deep_scan_penalty: 0.05,

            // Rewards
            hack_xp_per_tier: 40,
            hack_credits_per_tier: 150,
            hack_reputation_per_tier: 1,

            // Enrichment
            enrichment_timeout_ms: 8000,

            // Session
            max_log_entries: 200,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `ROGUECODE_CONFIG` when set, defaults otherwise
    pub fn from_env_or_default() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_success) || !(0.0..=1.0).contains(&self.max_success) {
            return Err(RogueError::Config(
                "min_success and max_success must be within [0, 1]".into(),
            ));
        }

        if self.min_success >= self.max_success {
            return Err(RogueError::Config(format!(
                "min_success ({}) should be < max_success ({})",
                self.min_success, self.max_success
            )));
        }

        if self.base_xp_to_next_level == 0 {
            return Err(RogueError::Config(
                "base_xp_to_next_level must be positive".into(),
            ));
        }

        // A factor at or below 1.0 would let the threshold stall or shrink
        if self.xp_growth_factor <= 1.0 {
            return Err(RogueError::Config(format!(
                "xp_growth_factor ({}) must be > 1.0",
                self.xp_growth_factor
            )));
        }

        if self.enrichment_timeout_ms == 0 {
            return Err(RogueError::Config(
                "enrichment_timeout_ms must be positive".into(),
            ));
        }

        if self.max_log_entries == 0 {
            return Err(RogueError::Config("max_log_entries must be positive".into()));
        }

        Ok(())
    }
}
