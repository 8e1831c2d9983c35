//! Utility and flavor commands: help, status, tools, panels, connections

use chrono::Utc;

use crate::command::parser::Command;
use crate::command::resolver::{CommandResolver, Verb};
use crate::command::response::{Response, ShellAction};
use crate::content::flavor;
use crate::core::error::{Result, RogueError};
use crate::core::types::TargetId;
use crate::world::mission::MissionStatus;

/// Upgradeable modules: (skill id, display name, from, to, changelog)
const UPGRADES: [(&str, &str, &str, &str, [&str; 4]); 3] = [
    (
        "ai",
        "AI assistant",
        "1.2.3",
        "1.3.0",
        [
            "Improved natural language processing",
            "Added support for advanced hacking techniques",
            "Enhanced pattern recognition algorithms",
            "Fixed memory leak issues",
        ],
    ),
    (
        "firewall",
        "Firewall",
        "2.4.1",
        "2.5.0",
        [
            "Enhanced intrusion detection system",
            "Added deep packet inspection",
            "Improved zero-day vulnerability protection",
            "Reduced false positive rate",
        ],
    ),
    (
        "toolkit",
        "Hacking toolkit",
        "3.1.2",
        "3.2.0",
        [
            "Added new exploit frameworks",
            "Improved password cracking algorithms",
            "Enhanced stealth capabilities",
            "Added support for quantum encryption",
        ],
    ),
];

const GENERAL_HELP: &str = "Available commands:
  help       - Show this help message
  clear      - Clear the terminal
  status     - Show current status
  scan       - Scan a target system or network
  inject     - Inject malware or payload into a target
  hack       - Attempt to hack a target
  download   - Download files or data
  trace      - Trace a target's location or activity
  decrypt    - Decrypt encrypted data
  analyze    - Analyze data or systems
  upgrade    - Upgrade your hacking tools
  mission    - Generate, accept and complete missions
  missions   - List your missions
  connect    - Connect to a remote system
  exit       - Exit the current system
  skills     - View your skill tree
  inventory  - View your inventory
  settings   - Open settings
  reset      - Reset stats or the whole game
  fix        - Repair inconsistent stats
  debug      - Show diagnostics

Type 'help [command]' for more information on a specific command.";

fn help_topic(verb: Verb) -> Option<&'static str> {
    let text = match verb {
        Verb::Help => "help - Show available commands\nUsage: help [command]",
        Verb::Clear => "clear - Clear the terminal\nUsage: clear",
        Verb::Status => "status - Show your operative status and system summary\nUsage: status",
        Verb::Scan => {
            "scan - Scan a target system or network
Usage: scan <target> [options]
Options:
  --deep      Perform a deep scan listing services (slightly less reliable)
  --vulns     Scan for vulnerabilities
  --stealth   Quieter probes, lower success chance
  --force     Aggressive probes, higher success chance
Examples:
  scan 192.168.1.1
  scan firewall --vulns
  scan network --deep"
        }
        Verb::Inject => {
            "inject - Inject malware or payload into a target
Usage: inject <payload> <target> [options]
Payloads: malware, virus, worm, trojan, keylogger, spyware, backdoor, rootkit, ransomware
Options:
  --stealth   Use stealth mode (less likely to succeed, less detectable)
  --force     Force injection (may trigger alarms)
Examples:
  inject malware server
  inject keylogger workstation --stealth
  inject rootkit firewall --force"
        }
        Verb::Hack => {
            "hack - Attempt to break into a target
Usage: hack <target> [options]
Options:
  --bruteforce  Raise the odds at the cost of noise
  --quiet       Nearly hopeless, but success earns double reputation
An injected payload on the target improves your odds.
Examples:
  hack workstation
  hack mainframe --bruteforce"
        }
        Verb::Download => "download - Download files or data\nUsage: download <target>\nExamples:\n  download logs\n  download payroll.db",
        Verb::Trace => "trace - Trace a target's location or activity\nUsage: trace <target>",
        Verb::Decrypt => "decrypt - Decrypt encrypted data\nUsage: decrypt <target>",
        Verb::Analyze => "analyze - Analyze data or systems\nUsage: analyze <target>",
        Verb::Upgrade => "upgrade - Upgrade your hacking tools\nUsage: upgrade ai|firewall|toolkit",
        Verb::Mission => {
            "mission - Work the mission board
Usage:
  mission generate          Create a new mission
  mission list [status]     List missions (available, active, completed)
  mission accept <id>       Accept an available mission
  mission info <id>         Show a mission briefing
  mission complete <id>     Complete an active mission and collect rewards"
        }
        Verb::Missions => "missions - List your missions\nUsage: missions [status]",
        Verb::Connect => "connect - Connect to a remote system\nUsage: connect <target>",
        Verb::Exit => "exit - Exit the current system\nUsage: exit",
        Verb::Skills => "skills - View your skill tree\nUsage: skills",
        Verb::Inventory => "inventory - View your inventory\nUsage: inventory (alias: inv)",
        Verb::Settings => "settings - Open the settings panel\nUsage: settings",
        Verb::Reset => {
            "reset - Reset progress
Usage:
  reset stats   Level, XP, credits and reputation back to defaults
  reset all     Wipe the player and every mission, target and payload"
        }
        Verb::Fix => "fix - Repair inconsistent stats\nUsage: fix stats",
        Verb::Debug => "debug - Show diagnostics\nUsage: debug xp|state",
        Verb::Unknown => return None,
    };
    Some(text)
}

impl CommandResolver {
    pub(crate) fn help(&self, command: &Command) -> Result<Response> {
        let Some(topic) = command.arg(0) else {
            return Ok(Response::info(GENERAL_HELP).with_action(ShellAction::OpenHelpPanel));
        };

        let topic = topic.to_lowercase();
        help_topic(Verb::from_action(&topic))
            .map(Response::info)
            .ok_or_else(|| {
                RogueError::InvalidArgument(format!(
                    "No help available for '{}'. Type 'help' for a list of commands.",
                    topic
                ))
            })
    }

    pub(crate) fn clear(&self) -> Response {
        Response::system("Terminal cleared.").with_action(ShellAction::ClearTerminal)
    }

    pub(crate) fn status(&self) -> Response {
        let p = self.progression.player();
        let hacked = self.world.list_targets().iter().filter(|t| t.hacked).count();
        let active = self.world.list_missions(Some(MissionStatus::Active)).len();

        Response::info(format!(
            "System Status: Online\nConnection: {}\nTrace Status: Clean\n\nOperative:\nLevel: {}\nXP: {}/{}\nCredits: {}\nReputation: {}\n\nActive missions: {}\nCompromised targets: {}\nActive payloads: {}",
            self.world.current_system().unwrap_or("Local"),
            p.level,
            p.xp,
            p.xp_to_next_level,
            p.credits,
            p.reputation,
            active,
            hacked,
            self.world.list_injections().len()
        ))
    }

    pub(crate) fn download(&mut self, command: &Command) -> Result<Response> {
        let target = Self::required_arg(command, 0, "No target specified.", "download <target>")?;

        if target.eq_ignore_ascii_case("logs") {
            let entries = flavor::system_logs(&mut *self.rng, Utc::now());
            return Ok(Response::success(format!(
                "Downloaded system logs:\n\n{}\n\nDownload complete. {} log entries retrieved.",
                entries.join("\n"),
                entries.len()
            )));
        }

        let transfer = flavor::file_transfer(&mut *self.rng);
        Ok(Response::success(format!(
            "Downloading {}...\nFile size: {} MB\nSpeed: {} MB/s\nEstimated time: {} seconds\n\nDownload complete. File saved to local storage.",
            target, transfer.size_mb, transfer.speed_mbps, transfer.seconds
        )))
    }

    pub(crate) fn trace(&mut self, command: &Command) -> Result<Response> {
        let target = Self::required_arg(command, 0, "No target specified.", "trace <target>")?;
        Ok(Response::success(flavor::trace_report(&mut *self.rng, target)))
    }

    pub(crate) fn decrypt(&mut self, command: &Command) -> Result<Response> {
        let target = Self::required_arg(command, 0, "No target specified.", "decrypt <target>")?;
        let scrambled = flavor::glitch(&mut *self.rng, flavor::SECRET_MESSAGE, 0.7);

        Ok(Response::success(format!(
            "Decrypting {}...\n\nEncrypted data:\n{}\n\nApplying decryption algorithms...\nAnalyzing patterns...\nBreaking encryption...\n\nDecryption successful!\n\nDecrypted data:\n{}\n\nDecryption complete.",
            target,
            scrambled,
            flavor::SECRET_MESSAGE
        ))
        .with_action(ShellAction::DecryptSuccess))
    }

    pub(crate) fn analyze(&mut self, command: &Command) -> Result<Response> {
        let target = Self::required_arg(command, 0, "No target specified.", "analyze <target>")?;
        Ok(
            Response::success(flavor::analysis_report(&mut *self.rng, target, Utc::now()))
                .with_action(ShellAction::AnalyzeComplete),
        )
    }

    pub(crate) fn upgrade(&mut self, command: &Command) -> Result<Response> {
        let module = Self::required_arg(
            command,
            0,
            "No upgrade target specified.",
            "upgrade ai|firewall|toolkit",
        )?
        .to_lowercase();

        let Some((skill, name, from, to, changelog)) = UPGRADES.iter().find(|u| u.0 == module) else {
            return Err(RogueError::InvalidArgument(format!(
                "Unknown upgrade target '{}'.\nAvailable upgrade targets: ai, firewall, toolkit",
                module
            )));
        };

        if !self.progression.add_skill(*skill) {
            return Ok(Response::info(format!(
                "{} is already at version {}. No upgrade available.",
                name, to
            )));
        }
        tracing::info!("Upgraded {} to {}", skill, to);

        let action = match *skill {
            "ai" => ShellAction::UpgradeAi,
            "firewall" => ShellAction::UpgradeFirewall,
            _ => ShellAction::UpgradeToolkit,
        };
        let changes: Vec<String> = changelog.iter().map(|c| format!("- {}", c)).collect();

        Ok(Response::success(format!(
            "Upgrading {}...\n\nCurrent version: {}\nNew version: {}\n\nChangelog:\n{}\n\nUpgrade complete. {} is now at version {}.",
            name.to_lowercase(),
            from,
            to,
            changes.join("\n"),
            name,
            to
        ))
        .with_action(action))
    }

    pub(crate) fn connect(&mut self, command: &Command) -> Result<Response> {
        let target = Self::required_arg(command, 0, "No target specified.", "connect <target>")?;
        let (security, mut access) = flavor::connection_levels(&mut *self.rng);
        if self
            .world
            .get_target(&TargetId::new(target))
            .is_some_and(|t| t.hacked)
        {
            access = "Admin";
        }

        if let Some(previous) = self.world.set_current_system(Some(target.to_string())) {
            tracing::debug!("Dropped connection to {}", previous);
        }

        Ok(Response::success(format!(
            "Establishing secure connection to {target}...\nAuthenticating...\nBypassing security measures...\nConnection established.\n\nWelcome to {target} system.\nSecurity level: {security}\nAccess level: {access}\n\nType 'help' for available commands."
        ))
        .with_action(ShellAction::ConnectSystem))
    }

    pub(crate) fn exit(&mut self) -> Response {
        match self.world.set_current_system(None) {
            Some(system) => Response::system(format!(
                "Disconnecting from {}...\nConnection closed.",
                system
            ))
            .with_action(ShellAction::ExitSystem),
            None => Response::info("Not connected to any remote system."),
        }
    }

    pub(crate) fn skills(&self) -> Response {
        let skills = &self.progression.player().skills;
        let text = if skills.is_empty() {
            "Opening skill tree...\n\nNo skills unlocked yet. Try 'upgrade toolkit'.".to_string()
        } else {
            let list: Vec<&str> = skills.iter().map(String::as_str).collect();
            format!("Opening skill tree...\n\nUnlocked: {}", list.join(", "))
        };
        Response::system(text).with_action(ShellAction::OpenSkillTree)
    }

    pub(crate) fn inventory(&self) -> Response {
        let lines: Vec<String> = self
            .progression
            .player()
            .inventory
            .iter()
            .map(|item| format!("- {} ({:?}, {:?}): {}", item.name, item.kind, item.rarity, item.description))
            .collect();
        let body = if lines.is_empty() {
            "Inventory is empty.".to_string()
        } else {
            lines.join("\n")
        };
        Response::system(format!("Opening inventory...\n\n{}", body)).with_action(ShellAction::OpenInventory)
    }

    pub(crate) fn settings(&self) -> Response {
        Response::system("Opening settings...").with_action(ShellAction::OpenSettingsPanel)
    }
}
