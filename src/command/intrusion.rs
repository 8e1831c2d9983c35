//! scan, inject and hack

use chrono::Utc;

use crate::command::odds::{hack_odds, inject_odds, roll, scan_odds, success_probability};
use crate::command::parser::Command;
use crate::command::resolver::CommandResolver;
use crate::command::response::{Response, ResponsePayload, ShellAction};
use crate::content::network::{scan_target, ScanOptions};
use crate::core::error::{Result, RogueError};
use crate::core::types::TargetId;
use crate::llm::enrichment::ScanRequest;
use crate::world::injection::{Injection, PayloadKind};
use crate::world::target::TargetKind;

const SCAN_USAGE: &str = "scan <target> [--deep] [--vulns]";
const INJECT_USAGE: &str = "inject <payload> <target> [--stealth|--force]";
const HACK_USAGE: &str = "hack <target> [--bruteforce|--quiet]";

const HACK_BANNER: &str = r"
 _   _            _    _
| | | | __ _  ___| | _(_)_ __   __ _
| |_| |/ _` |/ __| |/ / | '_ \ / _` |
|  _  | (_| | (__|   <| | | | | (_| |
|_| |_|\__,_|\___|_|\_\_|_| |_|\__, |
                               |___/
";

impl CommandResolver {
    pub(crate) async fn scan(&mut self, command: &Command) -> Result<Response> {
        let name = Self::required_arg(command, 0, "No target specified.", SCAN_USAGE)?;
        let options = ScanOptions {
            deep: command.has_flag("deep"),
            vulns: command.has_flag("vulns"),
        };

        let kind = self.known_kind(name);
        let odds = scan_odds(
            &self.config,
            kind,
            options.deep,
            command.has_flag("stealth"),
            command.has_flag("force"),
        );
        let p = success_probability(&odds, &self.config);

        if !roll(&mut *self.rng, p) {
            tracing::info!("Scan of {} dropped (p={:.2})", name, p);
            return Ok(Response::warning(format!(
                "Scanning {}...\n\nNo response. The target dropped our probes.\nTry again, or scan without --deep.",
                name
            )));
        }

        let report = scan_target(&mut *self.rng, name, options, Utc::now());
        let request = ScanRequest {
            target: name.to_string(),
            deep: options.deep,
            vulns: options.vulns,
            facts: report.facts(),
        };

        let mut text = report.render();
        if let Some(narrative) = self.scan_enrichment(&request).await {
            text.push_str("\n\n");
            text.push_str(&narrative);
        }

        let stored = self.world.upsert_target(report.target).clone();
        Ok(Response::success(text).with_payload(ResponsePayload::Target(stored)))
    }

    pub(crate) fn inject(&mut self, command: &Command) -> Result<Response> {
        if command.args.len() < 2 {
            return Err(RogueError::missing("Insufficient arguments.", INJECT_USAGE));
        }
        let payload_name = Self::required_arg(command, 0, "No payload specified.", INJECT_USAGE)?;
        let target = Self::required_arg(command, 1, "No target specified.", INJECT_USAGE)?;

        let payload = PayloadKind::parse(payload_name).ok_or_else(|| {
            let known: Vec<String> = PayloadKind::ALL.iter().map(|p| p.to_string()).collect();
            RogueError::InvalidArgument(format!(
                "Unknown payload '{}'. Available payloads: {}",
                payload_name,
                known.join(", ")
            ))
        })?;

        let stealth = command.has_flag("stealth");
        let force = command.has_flag("force");
        let odds = inject_odds(&self.config, payload, self.known_kind(target), stealth, force);
        let p = success_probability(&odds, &self.config);

        if !roll(&mut *self.rng, p) {
            tracing::info!("Injection of {} into {} rejected (p={:.2})", payload, target, p);
            return Ok(Response::error(format!(
                "Injection failed: Target {} has rejected the {} payload.\nPossible causes:\n- Target system has advanced protection\n- Payload is incompatible with target\n- Connection instability\n\nTry using --force flag or a different payload.",
                target, payload
            )));
        }

        let injection = Injection::new(payload, target, stealth, force, Utc::now());
        self.world.add_injection(injection.clone());

        let mut text = format!(
            "Injecting {} into {} █████▒▒▒▒▒ 60%\n\nInjection successful!\nPayload ID: {}\nTarget: {}\nStatus: {}\nDetection Risk: {}\nEffect: {}",
            payload,
            target,
            injection.id,
            target,
            if stealth { "Hidden" } else { "Active" },
            injection.detection_risk(),
            injection.effect
        );
        if stealth {
            text.push_str("\n\nStealth mode active: Payload is running with minimal footprint.");
        }
        if force {
            text.push_str("\n\nWarning: Force mode may have triggered security alerts.");
        }

        Ok(Response::success(text).with_payload(ResponsePayload::Injection(injection)))
    }

    pub(crate) fn hack(&mut self, command: &Command) -> Result<Response> {
        let name = Self::required_arg(command, 0, "No target specified.", HACK_USAGE)?;
        let id = TargetId::new(name);

        if let Some(target) = self.world.get_target(&id).filter(|t| t.hacked) {
            return Ok(Response::info(format!(
                "{} is already compromised. Your access persists; there is nothing more to take.",
                target.name
            ))
            .with_payload(ResponsePayload::Target(target.clone())));
        }

        let bruteforce = command.has_flag("bruteforce");
        let quiet = command.has_flag("quiet");
        let injected = self.world.has_injection_for(&id);
        let kind = self.known_kind(name);
        let odds = hack_odds(&self.config, kind, bruteforce, quiet, injected);
        let p = success_probability(&odds, &self.config);

        let mut text = format!(
            "{}\nInitiating hack on {}...\nBypassing firewall...\nExploiting vulnerabilities...\nGaining access...\n\n",
            HACK_BANNER, name
        );

        if !roll(&mut *self.rng, p) {
            tracing::info!("Hack on {} failed (p={:.2})", name, p);
            text.push_str("Hack failed. Target security measures blocked the attempt.");
            if bruteforce {
                text.push_str("\nBrute-force traffic was logged by the target.");
            }
            return Ok(Response::error(text).with_action(ShellAction::HackFailure));
        }

        let record = self.world.mark_target_hacked(name, Utc::now());
        let tier = kind.reward_tier();
        let xp = tier * self.config.hack_xp_per_tier;
        let credits = tier * self.config.hack_credits_per_tier;
        let mut reputation = tier * self.config.hack_reputation_per_tier;
        if quiet {
            reputation *= 2;
        }

        let gain = self.progression.add_xp(xp);
        let credit = self.progression.grant_credits(credits);
        let rep = self.progression.grant_reputation(reputation);
        tracing::info!("Hacked {} ({}): +{} XP, +{} credits", name, kind, xp, credits);

        text.push_str("Hack successful! You now have access to the system.");
        if injected {
            text.push_str("\nYour planted payload softened the target's defenses.");
        }
        if quiet {
            text.push_str("\nNo alarms tripped. Your reputation grows faster in silence.");
        }
        text.push_str(&format!(
            "\n\nRewards:\n+{} XP ({})\nCredits: {} → {}\nReputation: {} → {}",
            xp,
            gain.describe(),
            credit.before,
            credit.after,
            rep.before,
            rep.after
        ));
        if gain.leveled_up {
            text.push_str(&format!("\n\nLEVEL UP! You are now level {}.", gain.level));
        }

        Ok(Response::success(text)
            .with_action(ShellAction::HackSuccess)
            .with_payload(ResponsePayload::Target(record.target)))
    }

    /// Device class of a stored target, or a guess from its name
    fn known_kind(&self, name: &str) -> TargetKind {
        self.world
            .get_target(&TargetId::new(name))
            .map(|t| t.kind)
            .unwrap_or_else(|| TargetKind::classify(name))
    }
}
