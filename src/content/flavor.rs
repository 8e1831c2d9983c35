//! Flavor text for the utility commands: logs, traces, file analysis, glitches

use chrono::Duration;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::content::network::public_address;
use crate::core::types::Timestamp;

const LOG_TYPES: [&str; 6] = ["INFO", "WARNING", "ERROR", "SYSTEM", "AUTH", "NETWORK"];
const LOG_USERS: [&str; 5] = ["admin", "system", "root", "user", "service"];
const LOG_MESSAGES: [&str; 10] = [
    "User login successful",
    "Failed authentication attempt",
    "Service started",
    "Connection established",
    "File access denied",
    "Memory allocation failed",
    "Database query executed",
    "Scheduled task completed",
    "Configuration updated",
    "Security scan completed",
];

const FIRST_NAMES: [&str; 8] = ["John", "Jane", "Alex", "Sarah", "Michael", "Emma", "David", "Olivia"];
const LAST_NAMES: [&str; 8] = ["Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Garcia"];
const MAIL_DOMAINS: [&str; 4] = ["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];
const LOCATIONS: [&str; 6] = [
    "New York, USA",
    "London, UK",
    "Tokyo, Japan",
    "Sydney, Australia",
    "Berlin, Germany",
    "Paris, France",
];

const FILE_TYPES: [&str; 6] = ["Executable", "Document", "Image", "Audio", "Video", "Archive"];
const THREAT_LEVELS: [&str; 5] = ["None", "Low", "Medium", "High", "Critical"];

const GLITCH_CHARS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?/\\~`";

pub const SECRET_MESSAGE: &str = "This is a secret message that has been encrypted.";

fn pick<'a>(rng: &mut dyn RngCore, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// 3-7 fake system log lines from the last 24 hours
pub fn system_logs(rng: &mut dyn RngCore, now: Timestamp) -> Vec<String> {
    let count = rng.gen_range(3..=7);
    (0..count)
        .map(|_| {
            let at = now - Duration::milliseconds(rng.gen_range(0..86_400_000));
            format!(
                "[{}] [{}] [{}] {}",
                at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                pick(rng, &LOG_TYPES),
                pick(rng, &LOG_USERS),
                pick(rng, &LOG_MESSAGES)
            )
        })
        .collect()
}

/// Size in MB, speed in MB/s, and seconds to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub size_mb: u32,
    pub speed_mbps: u32,
    pub seconds: u32,
}

pub fn file_transfer(rng: &mut dyn RngCore) -> Transfer {
    let size_mb = rng.gen_range(100..1000);
    let speed_mbps = rng.gen_range(1..=10);
    Transfer {
        size_mb,
        speed_mbps,
        seconds: size_mb / speed_mbps,
    }
}

pub fn trace_report(rng: &mut dyn RngCore, target: &str) -> String {
    let first = pick(rng, &FIRST_NAMES);
    let last = pick(rng, &LAST_NAMES);
    let email = format!(
        "{}.{}@{}",
        first.to_lowercase(),
        last.to_lowercase(),
        pick(rng, &MAIL_DOMAINS)
    );
    let ip = public_address(rng);
    let location = pick(rng, &LOCATIONS);
    let hours = rng.gen_range(0..24);
    let hop = public_address(rng);

    format!(
        "Trace results for {target}:\n\nUser Profile:\nName: {first} {last}\nEmail: {email}\nIP Address: {ip}\nLocation: {location}\nLast Active: {hours} hours ago\n\nConnection Map:\n{target} → {hop} → {ip}\n\nTrace complete."
    )
}

pub fn analysis_report(rng: &mut dyn RngCore, target: &str, now: Timestamp) -> String {
    let created = now - Duration::days(rng.gen_range(0..365));
    let modified = now - Duration::days(rng.gen_range(0..30));
    let hash = format!("{:016x}{:016x}", rng.gen::<u64>(), rng.gen::<u64>());

    format!(
        "Analyzing {}...\n\nAnalysis complete.\n\nResults:\n- File type: {}\n- Size: {} KB\n- Created: {}\n- Modified: {}\n- Hash: {}\n- Threat level: {}\n\nNo malicious code detected.",
        target,
        pick(rng, &FILE_TYPES),
        rng.gen_range(1..=1000),
        created.format("%Y-%m-%d"),
        modified.format("%Y-%m-%d"),
        hash,
        pick(rng, &THREAT_LEVELS)
    )
}

/// Replace each character with a glitch symbol with probability `intensity`
pub fn glitch(rng: &mut dyn RngCore, text: &str, intensity: f64) -> String {
    let intensity = intensity.clamp(0.0, 1.0);
    text.chars()
        .map(|c| {
            if rng.gen_bool(intensity) {
                GLITCH_CHARS[rng.gen_range(0..GLITCH_CHARS.len())] as char
            } else {
                c
            }
        })
        .collect()
}

/// Security and access levels shown on connect
pub fn connection_levels(rng: &mut dyn RngCore) -> (&'static str, &'static str) {
    (pick(rng, &["Low", "Medium", "High"]), pick(rng, &["Guest", "User", "Admin"]))
}
