//! Scan and hack targets

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{TargetId, Timestamp};

/// Device class of a target, inferred from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Firewall,
    Server,
    Router,
    Workstation,
    Mobile,
    Iot,
    Generic,
}

impl TargetKind {
    /// Guess the device class from keywords in the target name.
    ///
    /// Keywords must match a whole word of the name: `corp-firewall`,
    /// `MailServer` and `gateway01` match, `pyramids` does not.
    pub fn classify(name: &str) -> Self {
        let words = name_words(name);
        let has = |keywords: &[&str]| words.iter().any(|w| keywords.contains(&w.as_str()));

        if has(&["firewall", "fwl", "ids", "waf"]) {
            TargetKind::Firewall
        } else if has(&["server", "srv", "mainframe", "database", "db"]) {
            TargetKind::Server
        } else if has(&["router", "rtr", "gateway", "switch"]) {
            TargetKind::Router
        } else if has(&["workstation", "wks", "desktop", "laptop", "pc"]) {
            TargetKind::Workstation
        } else if has(&["phone", "mobile", "tablet", "mob"]) {
            TargetKind::Mobile
        } else if has(&["iot", "camera", "thermostat", "printer", "sensor"]) {
            TargetKind::Iot
        } else {
            TargetKind::Generic
        }
    }

    /// Prefix for generated device ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            TargetKind::Firewall => "FWL",
            TargetKind::Server => "SRV",
            TargetKind::Router => "RTR",
            TargetKind::Workstation => "WKS",
            TargetKind::Mobile => "MOB",
            TargetKind::Iot => "IOT",
            TargetKind::Generic => "DEV",
        }
    }

    /// Added to scan/inject/hack odds; hardened devices are negative
    pub fn security_modifier(&self) -> f64 {
        match self {
            TargetKind::Firewall => -0.2,
            TargetKind::Server => -0.1,
            TargetKind::Router => -0.05,
            TargetKind::Workstation => 0.1,
            TargetKind::Mobile => 0.05,
            TargetKind::Iot => 0.15,
            TargetKind::Generic => 0.0,
        }
    }

    /// Reward multiplier for a successful hack
    pub fn reward_tier(&self) -> u64 {
        match self {
            TargetKind::Workstation | TargetKind::Mobile | TargetKind::Iot => 1,
            TargetKind::Router | TargetKind::Generic => 2,
            TargetKind::Server => 3,
            TargetKind::Firewall => 4,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetKind::Firewall => "firewall",
            TargetKind::Server => "server",
            TargetKind::Router => "router",
            TargetKind::Workstation => "workstation",
            TargetKind::Mobile => "mobile",
            TargetKind::Iot => "iot",
            TargetKind::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// Reachability reported by the last scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Online,
    Offline,
    Unknown,
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetStatus::Online => write!(f, "Online"),
            TargetStatus::Offline => write!(f, "Offline"),
            TargetStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A known target in the world store
///
/// `hacked` only ever goes from false to true; a full reset is the only
/// way to clear it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub name: String,
    pub kind: TargetKind,
    pub device_id: String,
    pub ip: String,
    pub mac: String,
    pub os: String,
    pub status: TargetStatus,
    pub open_ports: Vec<u16>,
    pub vulnerabilities: Vec<String>,
    pub hacked: bool,
    pub discovered_at: Timestamp,
    pub last_scan: Option<Timestamp>,
    pub hacked_at: Option<Timestamp>,
}

impl Target {
    /// A target seen for the first time without a scan (e.g. hacked blind)
    pub fn unscanned(name: &str, now: Timestamp) -> Self {
        let kind = TargetKind::classify(name);
        Self {
            id: TargetId::new(name),
            name: name.to_string(),
            kind,
            device_id: format!("{}-UNRESOLVED", kind.id_prefix()),
            ip: "unknown".to_string(),
            mac: "unknown".to_string(),
            os: "unknown".to_string(),
            status: TargetStatus::Unknown,
            open_ports: Vec::new(),
            vulnerabilities: Vec::new(),
            hacked: false,
            discovered_at: now,
            last_scan: None,
            hacked_at: None,
        }
    }

    /// Merge a fresh scan into this record, keeping hack state and discovery time
    pub fn absorb_scan(&mut self, scanned: Target) {
        self.kind = scanned.kind;
        self.device_id = scanned.device_id;
        self.ip = scanned.ip;
        self.mac = scanned.mac;
        self.os = scanned.os;
        self.status = scanned.status;
        self.open_ports = scanned.open_ports;
        self.vulnerabilities = scanned.vulnerabilities;
        self.last_scan = scanned.last_scan;
        self.hacked |= scanned.hacked;
        if self.hacked_at.is_none() {
            self.hacked_at = scanned.hacked_at;
        }
    }

    pub fn mark_hacked(&mut self, now: Timestamp) {
        if !self.hacked {
            self.hacked = true;
            self.hacked_at = Some(now);
        }
    }
}

/// Lowercased words of a target name, split at punctuation, camelCase
/// humps and letter/digit changes
fn name_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = match prev {
            Some(p) => {
                (p.is_lowercase() && c.is_uppercase())
                    || (p.is_alphabetic() && c.is_numeric())
                    || (p.is_numeric() && c.is_alphabetic())
            }
            None => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_classify() {
        assert_eq!(TargetKind::classify("corp-firewall"), TargetKind::Firewall);
        assert_eq!(TargetKind::classify("MailServer"), TargetKind::Server);
        assert_eq!(TargetKind::classify("gateway01"), TargetKind::Router);
        assert_eq!(TargetKind::classify("workstation"), TargetKind::Workstation);
        assert_eq!(TargetKind::classify("ceo-phone"), TargetKind::Mobile);
        assert_eq!(TargetKind::classify("lobby-camera"), TargetKind::Iot);
        assert_eq!(TargetKind::classify("alpha"), TargetKind::Generic);
        assert_eq!(TargetKind::classify("srv01"), TargetKind::Server);
    }

    #[test]
    fn test_classify_ignores_keywords_inside_words() {
        assert_eq!(TargetKind::classify("kids-tablet"), TargetKind::Mobile);
        assert_eq!(TargetKind::classify("pyramids"), TargetKind::Generic);
        assert_eq!(TargetKind::classify("feedback"), TargetKind::Generic);
        assert_eq!(TargetKind::classify("epcot"), TargetKind::Generic);
        assert_eq!(TargetKind::classify("observer"), TargetKind::Generic);
    }

    #[test]
    fn test_name_words_splits_humps_and_digits() {
        assert_eq!(name_words("MailServer_02b"), vec!["mail", "server", "02", "b"]);
        assert_eq!(name_words("--"), Vec::<String>::new());
    }

    #[test]
    fn test_harder_targets_pay_more() {
        assert!(TargetKind::Firewall.security_modifier() < TargetKind::Workstation.security_modifier());
        assert!(TargetKind::Firewall.reward_tier() > TargetKind::Workstation.reward_tier());
    }

    #[test]
    fn test_hacked_is_monotonic() {
        let now = Utc::now();
        let mut target = Target::unscanned("alpha", now);
        target.mark_hacked(now);
        assert!(target.hacked);

        // A later scan reporting an unhacked device does not undo it
        let rescanned = Target::unscanned("alpha", now);
        target.absorb_scan(rescanned);
        assert!(target.hacked);
        assert_eq!(target.hacked_at, Some(now));
    }
}
