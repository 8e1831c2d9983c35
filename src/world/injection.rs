//! Injected payloads ("viruses")
//!
//! Injections never expire. A live injection on a target makes later
//! hacks against it easier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{InjectionId, TargetId, Timestamp};

/// Payload families the player can inject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Malware,
    Virus,
    Worm,
    Trojan,
    Keylogger,
    Spyware,
    Backdoor,
    Rootkit,
    Ransomware,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 9] = [
        PayloadKind::Malware,
        PayloadKind::Virus,
        PayloadKind::Worm,
        PayloadKind::Trojan,
        PayloadKind::Keylogger,
        PayloadKind::Spyware,
        PayloadKind::Backdoor,
        PayloadKind::Rootkit,
        PayloadKind::Ransomware,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "malware" | "payload" => Some(PayloadKind::Malware),
            "virus" => Some(PayloadKind::Virus),
            "worm" => Some(PayloadKind::Worm),
            "trojan" => Some(PayloadKind::Trojan),
            "keylogger" => Some(PayloadKind::Keylogger),
            "spyware" => Some(PayloadKind::Spyware),
            "backdoor" => Some(PayloadKind::Backdoor),
            "rootkit" => Some(PayloadKind::Rootkit),
            "ransomware" => Some(PayloadKind::Ransomware),
            _ => None,
        }
    }

    /// Base injection success rate before flags and target security
    pub fn base_rate(&self) -> f64 {
        match self {
            PayloadKind::Malware | PayloadKind::Trojan | PayloadKind::Keylogger => 0.8,
            PayloadKind::Virus | PayloadKind::Spyware => 0.75,
            PayloadKind::Worm | PayloadKind::Backdoor => 0.7,
            PayloadKind::Rootkit => 0.6,
            PayloadKind::Ransomware => 0.55,
        }
    }

    pub fn effect(&self) -> &'static str {
        match self {
            PayloadKind::Malware => "General-purpose foothold on the host",
            PayloadKind::Virus => "Self-replicating code attached to host binaries",
            PayloadKind::Worm => "Spreads laterally across the local network",
            PayloadKind::Trojan => "Disguised implant awaiting remote commands",
            PayloadKind::Keylogger => "Captures keystrokes and harvested credentials",
            PayloadKind::Spyware => "Silently exfiltrates activity and documents",
            PayloadKind::Backdoor => "Persistent remote access channel",
            PayloadKind::Rootkit => "Kernel-level persistence hidden from monitoring",
            PayloadKind::Ransomware => "Encrypts storage and locks out operators",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PayloadKind::Malware => "malware",
            PayloadKind::Virus => "virus",
            PayloadKind::Worm => "worm",
            PayloadKind::Trojan => "trojan",
            PayloadKind::Keylogger => "keylogger",
            PayloadKind::Spyware => "spyware",
            PayloadKind::Backdoor => "backdoor",
            PayloadKind::Rootkit => "rootkit",
            PayloadKind::Ransomware => "ransomware",
        };
        f.write_str(s)
    }
}

/// A payload planted on a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injection {
    pub id: InjectionId,
    pub payload: PayloadKind,
    pub target: TargetId,
    pub target_name: String,
    pub timestamp: Timestamp,
    pub stealth: bool,
    pub force: bool,
    pub effect: String,
}

impl Injection {
    pub fn new(payload: PayloadKind, target_name: &str, stealth: bool, force: bool, now: Timestamp) -> Self {
        Self {
            id: InjectionId::new(),
            payload,
            target: TargetId::new(target_name),
            target_name: target_name.to_string(),
            timestamp: now,
            stealth,
            force,
            effect: payload.effect().to_string(),
        }
    }

    pub fn detection_risk(&self) -> &'static str {
        if self.stealth {
            "Low"
        } else if self.force {
            "High"
        } else {
            "Medium"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payloads() {
        assert_eq!(PayloadKind::parse("Keylogger"), Some(PayloadKind::Keylogger));
        assert_eq!(PayloadKind::parse("payload"), Some(PayloadKind::Malware));
        assert_eq!(PayloadKind::parse("sandwich"), None);
        for kind in PayloadKind::ALL {
            assert_eq!(PayloadKind::parse(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn test_detection_risk() {
        let now = chrono::Utc::now();
        assert_eq!(Injection::new(PayloadKind::Worm, "srv", true, true, now).detection_risk(), "Low");
        assert_eq!(Injection::new(PayloadKind::Worm, "srv", false, true, now).detection_risk(), "High");
        assert_eq!(Injection::new(PayloadKind::Worm, "srv", false, false, now).detection_risk(), "Medium");
    }

    #[test]
    fn test_target_key_normalized() {
        let inj = Injection::new(PayloadKind::Rootkit, "Firewall", false, false, chrono::Utc::now());
        assert_eq!(inj.target, TargetId::new("firewall"));
        assert_eq!(inj.target_name, "Firewall");
    }
}
