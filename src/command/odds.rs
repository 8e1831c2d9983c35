//! Success odds for probability-gated commands
//!
//! Every gated command sums a base rate, flag modifiers, the target's
//! security modifier and (for hacks) an injection bonus, then clamps the sum
//! into `[min_success, max_success]` before a single uniform draw.

use rand::{Rng, RngCore};

use crate::core::config::GameConfig;
use crate::world::injection::PayloadKind;
use crate::world::target::TargetKind;

/// Additive terms feeding one probability
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OddsInput {
    pub base: f64,
    pub flag_modifier: f64,
    pub target_modifier: f64,
    pub injection_bonus: f64,
}

impl OddsInput {
    pub fn raw(&self) -> f64 {
        self.base + self.flag_modifier + self.target_modifier + self.injection_bonus
    }
}

/// Clamp the summed odds into the configured range
pub fn success_probability(input: &OddsInput, config: &GameConfig) -> f64 {
    input.raw().clamp(config.min_success, config.max_success)
}

/// One uniform draw against `p`
pub fn roll(rng: &mut dyn RngCore, p: f64) -> bool {
    rng.gen::<f64>() < p
}

pub fn scan_odds(config: &GameConfig, kind: TargetKind, deep: bool, stealth: bool, force: bool) -> OddsInput {
    let mut flag_modifier = 0.0;
    if deep {
        flag_modifier -= config.deep_scan_penalty;
    }
    if stealth {
        flag_modifier -= config.stealth_penalty;
    }
    if force {
        flag_modifier += config.force_bonus;
    }

    OddsInput {
        base: config.scan_base,
        flag_modifier,
        target_modifier: kind.security_modifier(),
        injection_bonus: 0.0,
    }
}

pub fn inject_odds(
    config: &GameConfig,
    payload: PayloadKind,
    kind: TargetKind,
    stealth: bool,
    force: bool,
) -> OddsInput {
    let mut flag_modifier = 0.0;
    if stealth {
        flag_modifier -= config.stealth_penalty;
    }
    if force {
        flag_modifier += config.force_bonus;
    }

    OddsInput {
        base: payload.base_rate(),
        flag_modifier,
        target_modifier: kind.security_modifier(),
        injection_bonus: 0.0,
    }
}

pub fn hack_odds(
    config: &GameConfig,
    kind: TargetKind,
    bruteforce: bool,
    quiet: bool,
    injected: bool,
) -> OddsInput {
    let mut flag_modifier = 0.0;
    if bruteforce {
        flag_modifier += config.bruteforce_bonus;
    }
    if quiet {
        flag_modifier -= config.quiet_penalty;
    }

    OddsInput {
        base: config.hack_base,
        flag_modifier,
        target_modifier: kind.security_modifier(),
        injection_bonus: if injected { config.injection_bonus } else { 0.0 },
    }
}
