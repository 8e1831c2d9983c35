//! Local mission generator
//!
//! Used whenever no enrichment provider supplies a briefing, and always for
//! the structured mission fields (type, target, difficulty, rewards).

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::world::mission::{MissionDraft, MissionType};

pub const MISSION_TARGETS: [&str; 10] = [
    "MegaCorp HQ",
    "NeoBank Systems",
    "Quantum Research Lab",
    "SynthTech Industries",
    "Global Defense Network",
    "Darkweb Server Cluster",
    "CyberSec Solutions",
    "Nexus Data Center",
    "Orbital Communications Array",
    "BlackMesa Research Facility",
];

const BASE_XP: f64 = 100.0;
const BASE_CREDITS: f64 = 200.0;
const BASE_REPUTATION: f64 = 1.0;
/// Seconds of time limit per difficulty point
const SECS_PER_DIFFICULTY: u32 = 600;

fn objectives(mission_type: MissionType) -> &'static [&'static str] {
    match mission_type {
        MissionType::Infiltration => &[
            "Gain access to the internal network",
            "Bypass security systems",
            "Plant a backdoor in the system",
            "Establish persistent access",
        ],
        MissionType::DataTheft => &[
            "Download confidential documents",
            "Extract customer database",
            "Retrieve encryption keys",
            "Copy proprietary algorithms",
        ],
        MissionType::Sabotage => &[
            "Corrupt system files",
            "Disable security protocols",
            "Plant false information",
            "Trigger system failures",
        ],
        MissionType::Surveillance => &[
            "Monitor network traffic",
            "Intercept communications",
            "Track target activities",
            "Gather intelligence",
        ],
        MissionType::Extraction => &[
            "Retrieve compromised agent data",
            "Recover stolen technology",
            "Extract undercover operative",
            "Secure sensitive information",
        ],
        MissionType::Defense => &[
            "Protect critical infrastructure",
            "Counter incoming cyber attacks",
            "Secure vulnerable systems",
            "Eliminate security breaches",
        ],
        MissionType::Recovery => &[
            "Recover deleted files",
            "Restore corrupted data",
            "Retrieve backup archives",
            "Salvage damaged systems",
        ],
    }
}

fn title_prefixes(mission_type: MissionType) -> &'static [&'static str] {
    match mission_type {
        MissionType::Infiltration => &["Silent Entry", "Breach Protocol", "Ghost Access", "Shadow Infiltration"],
        MissionType::DataTheft => &["Data Extraction", "Memory Heist", "Digital Larceny", "Information Raid"],
        MissionType::Sabotage => &["System Corruption", "Network Takedown", "Chaos Protocol", "Disrupt Operations"],
        MissionType::Surveillance => &["Silent Observer", "Digital Shadows", "Watchful Eye", "Network Monitor"],
        MissionType::Extraction => &["Asset Recovery", "Secure Extraction", "Retrieval Operation", "Recovery Protocol"],
        MissionType::Defense => &["Digital Fortress", "Firewall Guardian", "System Defense", "Security Protocol"],
        MissionType::Recovery => &["Data Salvage", "System Restoration", "Recovery Operation", "Digital Archaeology"],
    }
}

const INTROS: [&str; 4] = [
    "We have intel on {target} that requires immediate action.",
    "A high-priority operation targeting {target} has been authorized.",
    "Your expertise is needed for a mission involving {target}.",
    "An opportunity has emerged to infiltrate {target}.",
];

/// Indexed by difficulty - 1
const DIFFICULTY_NOTES: [&str; 5] = [
    "This should be a straightforward operation with minimal security.",
    "Standard security measures are in place, but nothing you can't handle.",
    "Be prepared for enhanced security protocols and active monitoring.",
    "High-level security systems are in place. Proceed with extreme caution.",
    "Maximum security alert. Only our best operatives are assigned to this level of mission.",
];

const OBJECTIVE_INTROS: [&str; 4] = [
    "Your primary objective is to {objective}.",
    "You are tasked with {objective}.",
    "Mission parameters require you to {objective}.",
    "Your assignment: {objective}.",
];

const CLOSINGS: [&str; 4] = [
    "Complete this mission with discretion. We can't afford any traces.",
    "Time is of the essence. Get in, complete the objective, and get out.",
    "Success in this mission will significantly advance our position.",
    "The data you acquire will be invaluable to our operations.",
];

fn pick<'a>(rng: &mut dyn RngCore, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Difficulty centred on half the player level, jittered by one step
pub fn difficulty_for_level(rng: &mut dyn RngCore, level: u32) -> u8 {
    let base = (level / 2).clamp(1, 5) as i32;
    let jitter = rng.gen_range(-1..=1);
    (base + jitter).clamp(1, 5) as u8
}

/// `floor(base * difficulty * U[0.8, 1.2))`
fn scaled_reward(rng: &mut dyn RngCore, base: f64, difficulty: u8) -> u64 {
    let spread: f64 = rng.gen_range(0.8..1.2);
    (base * difficulty as f64 * spread).floor() as u64
}

pub fn mission_title(rng: &mut dyn RngCore, mission_type: MissionType, target: &str) -> String {
    format!("{}: {}", pick(rng, title_prefixes(mission_type)), target)
}

pub fn mission_description(rng: &mut dyn RngCore, target: &str, objective: &str, difficulty: u8) -> String {
    let note = DIFFICULTY_NOTES[(difficulty.clamp(1, 5) - 1) as usize];
    format!(
        "{} {} {} {}",
        pick(rng, &INTROS).replace("{target}", target),
        note,
        pick(rng, &OBJECTIVE_INTROS).replace("{objective}", &objective.to_lowercase()),
        pick(rng, &CLOSINGS)
    )
}

/// Generate a complete mission draft scaled to the player's level.
/// The store assigns the id.
pub fn generate_mission(rng: &mut dyn RngCore, player_level: u32) -> MissionDraft {
    let mission_type = MissionType::ALL
        .choose(rng)
        .copied()
        .unwrap_or(MissionType::Infiltration);
    let target = pick(rng, &MISSION_TARGETS).to_string();
    let objective = pick(rng, objectives(mission_type)).to_string();
    let difficulty = difficulty_for_level(rng, player_level);

    let xp_reward = scaled_reward(rng, BASE_XP, difficulty);
    let credit_reward = scaled_reward(rng, BASE_CREDITS, difficulty);
    let reputation_reward = scaled_reward(rng, BASE_REPUTATION, difficulty);

    let title = mission_title(rng, mission_type, &target);
    let description = mission_description(rng, &target, &objective, difficulty);

    MissionDraft {
        id: None,
        title,
        mission_type,
        description,
        objective,
        target,
        difficulty,
        xp_reward,
        credit_reward,
        reputation_reward,
        time_limit_secs: difficulty as u32 * SECS_PER_DIFFICULTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_mission_is_well_formed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for level in 1..20 {
            let draft = generate_mission(&mut rng, level);
            assert!((1..=5).contains(&draft.difficulty));
            assert!(MISSION_TARGETS.contains(&draft.target.as_str()));
            assert!(objectives(draft.mission_type).contains(&draft.objective.as_str()));
            assert!(draft.title.ends_with(&draft.target));
            assert!(draft.description.contains(&draft.objective.to_lowercase()));
            assert_eq!(draft.time_limit_secs, draft.difficulty as u32 * 600);
            assert!(draft.id.is_none());
        }
    }

    #[test]
    fn test_rewards_scale_with_difficulty() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let draft = generate_mission(&mut rng, 6);
            let d = draft.difficulty as u64;
            assert!(draft.xp_reward >= 80 * d && draft.xp_reward < 120 * d);
            assert!(draft.credit_reward >= 160 * d && draft.credit_reward < 240 * d);
        }
    }

    #[test]
    fn test_difficulty_tracks_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(difficulty_for_level(&mut rng, 1) <= 2);
            assert!(difficulty_for_level(&mut rng, 10) >= 4);
        }
    }
}
