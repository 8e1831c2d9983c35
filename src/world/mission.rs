//! Missions and their status state machine
//!
//! available --accept--> active --complete--> completed
//!
//! `completed` is terminal and no transition skips a step.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{MissionId, Timestamp};

/// Mission categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionType {
    Infiltration,
    DataTheft,
    Sabotage,
    Surveillance,
    Extraction,
    Defense,
    Recovery,
}

impl MissionType {
    pub const ALL: [MissionType; 7] = [
        MissionType::Infiltration,
        MissionType::DataTheft,
        MissionType::Sabotage,
        MissionType::Surveillance,
        MissionType::Extraction,
        MissionType::Defense,
        MissionType::Recovery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MissionType::Infiltration => "INFILTRATION",
            MissionType::DataTheft => "DATA_THEFT",
            MissionType::Sabotage => "SABOTAGE",
            MissionType::Surveillance => "SURVEILLANCE",
            MissionType::Extraction => "EXTRACTION",
            MissionType::Defense => "DEFENSE",
            MissionType::Recovery => "RECOVERY",
        }
    }
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a mission is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Available,
    Active,
    Completed,
}

impl MissionStatus {
    /// The single legal successor of each state
    pub fn next(&self) -> Option<MissionStatus> {
        match self {
            MissionStatus::Available => Some(MissionStatus::Active),
            MissionStatus::Active => Some(MissionStatus::Completed),
            MissionStatus::Completed => None,
        }
    }

    pub fn can_transition_to(&self, to: MissionStatus) -> bool {
        self.next() == Some(to)
    }

    pub fn parse(s: &str) -> Option<MissionStatus> {
        match s.to_lowercase().as_str() {
            "available" => Some(MissionStatus::Available),
            "active" => Some(MissionStatus::Active),
            "completed" | "complete" => Some(MissionStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionStatus::Available => write!(f, "available"),
            MissionStatus::Active => write!(f, "active"),
            MissionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A mission before the store has taken ownership of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDraft {
    /// Leave empty to have the store assign `mission-<n>`
    pub id: Option<MissionId>,
    pub title: String,
    pub mission_type: MissionType,
    pub description: String,
    pub objective: String,
    pub target: String,
    /// 1 (routine) to 5 (maximum security)
    pub difficulty: u8,
    pub xp_reward: u64,
    pub credit_reward: u64,
    pub reputation_reward: u64,
    pub time_limit_secs: u32,
}

/// A mission record owned by the world store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub title: String,
    pub mission_type: MissionType,
    pub description: String,
    pub objective: String,
    pub target: String,
    pub difficulty: u8,
    pub xp_reward: u64,
    pub credit_reward: u64,
    pub reputation_reward: u64,
    pub time_limit_secs: u32,
    pub status: MissionStatus,
    pub created_at: Timestamp,
    pub accepted_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl Mission {
    pub fn from_draft(id: MissionId, draft: MissionDraft, now: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            mission_type: draft.mission_type,
            description: draft.description,
            objective: draft.objective,
            target: draft.target,
            difficulty: draft.difficulty.clamp(1, 5),
            xp_reward: draft.xp_reward,
            credit_reward: draft.credit_reward,
            reputation_reward: draft.reputation_reward,
            time_limit_secs: draft.time_limit_secs,
            status: MissionStatus::Available,
            created_at: now,
            accepted_at: None,
            completed_at: None,
        }
    }

    /// Multi-line briefing used by `mission info` and `mission generate`
    pub fn briefing(&self) -> String {
        format!(
            "[{}] {}\nType: {}\nTarget: {}\nDifficulty: {}/5\nStatus: {}\nObjective: {}\n\n{}\n\nRewards: {} XP, {} credits, {} reputation\nTime limit: {} min",
            self.id,
            self.title,
            self.mission_type,
            self.target,
            self.difficulty,
            self.status,
            self.objective,
            self.description,
            self.xp_reward,
            self.credit_reward,
            self.reputation_reward,
            self.time_limit_secs / 60
        )
    }

    /// One-line summary for listings
    pub fn summary_line(&self) -> String {
        format!(
            "{:<12} {:<10} {:<13} D{} {}",
            self.id.as_str(),
            self.status.to_string(),
            self.mission_type.as_str(),
            self.difficulty,
            self.title
        )
    }
}

/// A timestamped entry in the mission log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionLogEntry {
    pub timestamp: Timestamp,
    pub mission: MissionId,
    pub event: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_ordered() {
        use MissionStatus::*;
        assert!(Available.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));

        assert!(!Available.can_transition_to(Completed));
        assert!(!Active.can_transition_to(Available));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Completed.can_transition_to(Available));
        assert!(!Available.can_transition_to(Available));
        assert_eq!(Completed.next(), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(MissionStatus::parse("ACTIVE"), Some(MissionStatus::Active));
        assert_eq!(MissionStatus::parse("complete"), Some(MissionStatus::Completed));
        assert_eq!(MissionStatus::parse("pending"), None);
    }

    #[test]
    fn test_type_serialization() {
        let json = serde_json::to_string(&MissionType::DataTheft).unwrap();
        assert_eq!(json, "\"DATA_THEFT\"");
        assert_eq!(MissionType::DataTheft.to_string(), "DATA_THEFT");
    }

    #[test]
    fn test_from_draft_clamps_difficulty() {
        let draft = MissionDraft {
            id: None,
            title: "Ghost Access: Nexus Data Center".into(),
            mission_type: MissionType::Infiltration,
            description: "desc".into(),
            objective: "Plant a backdoor in the system".into(),
            target: "Nexus Data Center".into(),
            difficulty: 9,
            xp_reward: 100,
            credit_reward: 200,
            reputation_reward: 1,
            time_limit_secs: 600,
        };
        let mission = Mission::from_draft(MissionId::from("mission-1"), draft, chrono::Utc::now());
        assert_eq!(mission.difficulty, 5);
        assert_eq!(mission.status, MissionStatus::Available);
        assert!(mission.briefing().contains("Difficulty: 5/5"));
    }
}
