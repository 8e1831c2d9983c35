//! Local scan generator: addresses, device ids, ports, services, vulnerabilities

use rand::seq::{index, SliceRandom};
use rand::{Rng, RngCore};

use crate::core::types::Timestamp;
use crate::world::target::{Target, TargetKind, TargetStatus};

pub const COMMON_PORTS: [u16; 13] = [21, 22, 23, 25, 53, 80, 110, 143, 443, 3306, 3389, 5432, 8080];

pub const OPERATING_SYSTEMS: [&str; 4] = ["Linux 5.15", "Windows Server 2019", "FreeBSD 13.1", "Ubuntu 22.04"];

pub const VULNERABILITIES: [&str; 6] = [
    "Outdated OpenSSL (CVE-2023-0286)",
    "SQL Injection in login form",
    "Cross-Site Scripting in search function",
    "Default credentials (admin/admin)",
    "Directory traversal vulnerability",
    "Remote code execution in file upload",
];

/// Chance a scanned device reports Online
const ONLINE_CHANCE: f64 = 0.8;

pub fn service_name(port: u16) -> &'static str {
    match port {
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "dns",
        80 => "http",
        110 => "pop3",
        143 => "imap",
        443 => "https",
        3306 => "mysql",
        3389 => "rdp",
        5432 => "postgresql",
        8080 => "http-proxy",
        _ => "unknown",
    }
}

/// Private-range address used for scanned hosts
pub fn lan_address(rng: &mut dyn RngCore) -> String {
    format!("192.168.{}.{}", rng.gen_range(0..255), rng.gen_range(0..255))
}

/// Public-looking address (first octet 1-223)
pub fn public_address(rng: &mut dyn RngCore) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.gen_range(1..=223),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(1..=254)
    )
}

pub fn mac_address(rng: &mut dyn RngCore) -> String {
    let octets: Vec<String> = (0..6).map(|_| format!("{:02X}", rng.gen::<u8>())).collect();
    octets.join(":")
}

/// `<PREFIX>-<12 hex>`, prefix from the device class
pub fn device_id(rng: &mut dyn RngCore, kind: TargetKind) -> String {
    let suffix = rng.gen::<u64>() & 0xFFFF_FFFF_FFFF;
    format!("{}-{:012X}", kind.id_prefix(), suffix)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub deep: bool,
    pub vulns: bool,
}

/// A finished scan: the target record plus what to show about it
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub target: Target,
    pub options: ScanOptions,
}

impl ScanReport {
    pub fn render(&self) -> String {
        let t = &self.target;
        let ports: Vec<String> = t.open_ports.iter().map(|p| p.to_string()).collect();

        let mut text = format!(
            "Scan results for {}:\nDevice ID: {}\nIP: {}\nMAC: {}\nStatus: {}\nOS: {}\nOpen ports: {}",
            t.name,
            t.device_id,
            t.ip,
            t.mac,
            t.status,
            t.os,
            ports.join(", ")
        );

        if self.options.deep {
            text.push_str("\n\nServices:");
            for port in &t.open_ports {
                text.push_str(&format!("\n  {:>5}/tcp  {}", port, service_name(*port)));
            }
        }

        if self.options.vulns {
            if t.vulnerabilities.is_empty() {
                text.push_str("\n\nNo vulnerabilities detected.");
            } else {
                text.push_str("\n\nVulnerabilities detected:");
                for vuln in &t.vulnerabilities {
                    text.push_str(&format!("\n- {}", vuln));
                }
            }
        }

        text
    }

    /// Facts handed to the enrichment provider so its prose matches the record
    pub fn facts(&self) -> String {
        let t = &self.target;
        format!(
            "name={} class={} ip={} os={} status={} ports={:?} vulnerabilities={:?}",
            t.name, t.kind, t.ip, t.os, t.status, t.open_ports, t.vulnerabilities
        )
    }
}

/// Produce a fresh scan of `name`.
///
/// 1-5 distinct common ports, sorted. Vulnerabilities (0-2, distinct) are only
/// looked for when requested.
pub fn scan_target(rng: &mut dyn RngCore, name: &str, options: ScanOptions, now: Timestamp) -> ScanReport {
    let kind = TargetKind::classify(name);

    let port_count = rng.gen_range(1..=5);
    let mut open_ports: Vec<u16> = index::sample(rng, COMMON_PORTS.len(), port_count)
        .into_iter()
        .map(|i| COMMON_PORTS[i])
        .collect();
    open_ports.sort_unstable();

    let vulnerabilities = if options.vulns {
        let count = rng.gen_range(0..=2);
        index::sample(rng, VULNERABILITIES.len(), count)
            .into_iter()
            .map(|i| VULNERABILITIES[i].to_string())
            .collect()
    } else {
        Vec::new()
    };

    let status = if rng.gen_bool(ONLINE_CHANCE) {
        TargetStatus::Online
    } else {
        TargetStatus::Offline
    };

    let mut target = Target::unscanned(name, now);
    target.kind = kind;
    target.device_id = device_id(rng, kind);
    target.ip = lan_address(rng);
    target.mac = mac_address(rng);
    target.os = OPERATING_SYSTEMS.choose(rng).copied().unwrap_or("Unknown").to_string();
    target.status = status;
    target.open_ports = open_ports;
    target.vulnerabilities = vulnerabilities;
    target.last_scan = Some(now);

    ScanReport { target, options }
}
