//! Core type definitions used throughout the codebase

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wall-clock time for records in the world store
pub type Timestamp = DateTime<Utc>;

/// Unique identifier for missions (`mission-<n>`, short enough to type)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl MissionId {
    pub fn from_sequence(n: u32) -> Self {
        Self(format!("mission-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `n` for ids of the form `mission-<n>`
    pub fn sequence(&self) -> Option<u32> {
        self.0.strip_prefix("mission-")?.parse().ok()
    }
}

impl From<&str> for MissionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier for scan/hack targets - the lowercased target name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier for injected payloads, rendered as `0x` + 8 hex digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct InjectionId(pub String);

impl InjectionId {
    pub fn new() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(format!("0x{}", &simple[..8]))
    }
}

impl Default for InjectionId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_id_sequence() {
        assert_eq!(MissionId::from_sequence(3).as_str(), "mission-3");
        assert_eq!(MissionId::from("mission-3"), MissionId::from_sequence(3));
        assert_eq!(MissionId::from("mission-42").sequence(), Some(42));
        assert_eq!(MissionId::from("side-job").sequence(), None);
    }

    #[test]
    fn test_target_id_is_case_insensitive() {
        assert_eq!(TargetId::new("Alpha"), TargetId::new(" alpha "));
        assert_eq!(TargetId::new("Alpha").to_string(), "alpha");
    }

    #[test]
    fn test_injection_id_format() {
        let id = InjectionId::new();
        assert!(id.0.starts_with("0x"));
        assert_eq!(id.0.len(), 10);
    }
}
