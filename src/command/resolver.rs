//! Command resolution - maps a parsed command onto player and world state
//!
//! The resolver owns the progression model, the world store, the enrichment
//! provider and the single RNG every random draw goes through. Handlers live
//! in sibling modules as `impl CommandResolver` blocks.

use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use crate::command::parser::Command;
use crate::command::response::Response;
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::llm::enrichment::{EnrichmentProvider, OfflineEnrichment, ScanRequest};
use crate::progression::Progression;
use crate::world::mission::MissionType;
use crate::world::store::WorldStore;

/// Every verb the resolver understands. Anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Help,
    Clear,
    Status,
    Scan,
    Inject,
    Hack,
    Download,
    Trace,
    Decrypt,
    Analyze,
    Upgrade,
    Mission,
    Missions,
    Connect,
    Exit,
    Skills,
    Inventory,
    Settings,
    Reset,
    Fix,
    Debug,
    Unknown,
}

impl Verb {
    pub const ALL: [Verb; 21] = [
        Verb::Help,
        Verb::Clear,
        Verb::Status,
        Verb::Scan,
        Verb::Inject,
        Verb::Hack,
        Verb::Download,
        Verb::Trace,
        Verb::Decrypt,
        Verb::Analyze,
        Verb::Upgrade,
        Verb::Mission,
        Verb::Missions,
        Verb::Connect,
        Verb::Exit,
        Verb::Skills,
        Verb::Inventory,
        Verb::Settings,
        Verb::Reset,
        Verb::Fix,
        Verb::Debug,
    ];

    pub fn from_action(action: &str) -> Verb {
        match action {
            "help" => Verb::Help,
            "clear" => Verb::Clear,
            "status" => Verb::Status,
            "scan" => Verb::Scan,
            "inject" => Verb::Inject,
            "hack" => Verb::Hack,
            "download" => Verb::Download,
            "trace" => Verb::Trace,
            "decrypt" => Verb::Decrypt,
            "analyze" => Verb::Analyze,
            "upgrade" => Verb::Upgrade,
            "mission" => Verb::Mission,
            "missions" => Verb::Missions,
            "connect" => Verb::Connect,
            "exit" => Verb::Exit,
            "skills" => Verb::Skills,
            "inventory" | "inv" => Verb::Inventory,
            "settings" => Verb::Settings,
            "reset" => Verb::Reset,
            "fix" => Verb::Fix,
            "debug" => Verb::Debug,
            _ => Verb::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Verb::Help => "help",
            Verb::Clear => "clear",
            Verb::Status => "status",
            Verb::Scan => "scan",
            Verb::Inject => "inject",
            Verb::Hack => "hack",
            Verb::Download => "download",
            Verb::Trace => "trace",
            Verb::Decrypt => "decrypt",
            Verb::Analyze => "analyze",
            Verb::Upgrade => "upgrade",
            Verb::Mission => "mission",
            Verb::Missions => "missions",
            Verb::Connect => "connect",
            Verb::Exit => "exit",
            Verb::Skills => "skills",
            Verb::Inventory => "inventory",
            Verb::Settings => "settings",
            Verb::Reset => "reset",
            Verb::Fix => "fix",
            Verb::Debug => "debug",
            Verb::Unknown => "unknown",
        }
    }
}

/// Resolves commands one at a time against session-owned state
pub struct CommandResolver {
    pub(crate) config: GameConfig,
    pub(crate) progression: Progression,
    pub(crate) world: WorldStore,
    pub(crate) enrichment: Box<dyn EnrichmentProvider>,
    pub(crate) rng: Box<dyn RngCore + Send>,
}

impl CommandResolver {
    /// Offline resolver with an entropy-seeded RNG
    pub fn new(config: GameConfig) -> Self {
        Self::with_parts(
            config,
            Box::new(OfflineEnrichment),
            Box::new(ChaCha8Rng::from_entropy()),
        )
    }

    /// Offline resolver with a caller-supplied RNG
    pub fn with_rng(config: GameConfig, rng: Box<dyn RngCore + Send>) -> Self {
        Self::with_parts(config, Box::new(OfflineEnrichment), rng)
    }

    pub fn with_parts(
        config: GameConfig,
        enrichment: Box<dyn EnrichmentProvider>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            progression: Progression::new(&config),
            world: WorldStore::new(),
            config,
            enrichment,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn progression_mut(&mut self) -> &mut Progression {
        &mut self.progression
    }

    pub fn world(&self) -> &WorldStore {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldStore {
        &mut self.world
    }

    pub fn set_enrichment(&mut self, enrichment: Box<dyn EnrichmentProvider>) {
        self.enrichment = enrichment;
    }

    /// Swap the random source, e.g. to replay a seeded run mid-session
    pub fn set_rng(&mut self, rng: Box<dyn RngCore + Send>) {
        self.rng = rng;
    }

    /// Resolve one command. Never fails: every error becomes an `error` response.
    pub async fn resolve(&mut self, command: &Command) -> Response {
        let Some(action) = command.action.as_deref() else {
            return unknown_command("(empty)");
        };

        let verb = Verb::from_action(action);
        tracing::debug!("Resolving {:?} args={:?} flags={:?}", verb, command.args, command.flags);

        let result = match verb {
            Verb::Help => self.help(command),
            Verb::Clear => Ok(self.clear()),
            Verb::Status => Ok(self.status()),
            Verb::Scan => self.scan(command).await,
            Verb::Inject => self.inject(command),
            Verb::Hack => self.hack(command),
            Verb::Download => self.download(command),
            Verb::Trace => self.trace(command),
            Verb::Decrypt => self.decrypt(command),
            Verb::Analyze => self.analyze(command),
            Verb::Upgrade => self.upgrade(command),
            Verb::Mission => self.mission(command).await,
            Verb::Missions => self.mission_list(command.arg(0)),
            Verb::Connect => self.connect(command),
            Verb::Exit => Ok(self.exit()),
            Verb::Skills => Ok(self.skills()),
            Verb::Inventory => Ok(self.inventory()),
            Verb::Settings => Ok(self.settings()),
            Verb::Reset => self.reset(command),
            Verb::Fix => self.fix(command),
            Verb::Debug => self.debug(command),
            Verb::Unknown => return unknown_command(action),
        };

        match result {
            Ok(response) => response,
            Err(e) if e.is_player_facing() => Response::error(e.to_string()),
            Err(e) => {
                tracing::error!("Command '{}' failed: {}", action, e);
                Response::error(format!(
                    "Error: '{}' failed due to an internal fault. Try again.",
                    action
                ))
            }
        }
    }

    fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.config.enrichment_timeout_ms)
    }

    /// Extra scan prose, or `None` when the provider has nothing usable
    pub(crate) async fn scan_enrichment(&self, request: &ScanRequest) -> Option<String> {
        let call = self.enrichment.scan_narrative(request);
        match tokio::time::timeout(self.enrichment_timeout(), call).await {
            Ok(Ok(enrichment)) => enrichment.into_text(),
            Ok(Err(e)) => {
                tracing::warn!("Scan enrichment ({}) failed: {}", self.enrichment.name(), e);
                None
            }
            Err(_) => {
                tracing::warn!("Scan enrichment ({}) timed out", self.enrichment.name());
                None
            }
        }
    }

    /// Extra briefing prose, or `None` when the provider has nothing usable
    pub(crate) async fn briefing_enrichment(&self, mission_type: MissionType, difficulty: u8) -> Option<String> {
        let call = self.enrichment.mission_briefing(mission_type, difficulty);
        match tokio::time::timeout(self.enrichment_timeout(), call).await {
            Ok(Ok(enrichment)) => enrichment.into_text(),
            Ok(Err(e)) => {
                tracing::warn!("Briefing enrichment ({}) failed: {}", self.enrichment.name(), e);
                None
            }
            Err(_) => {
                tracing::warn!("Briefing enrichment ({}) timed out", self.enrichment.name());
                None
            }
        }
    }

    /// Required positional argument or a usage error
    pub(crate) fn required_arg<'c>(
        command: &'c Command,
        index: usize,
        message: &str,
        usage: &str,
    ) -> Result<&'c str> {
        command
            .arg(index)
            .ok_or_else(|| crate::core::error::RogueError::missing(message, usage))
    }
}

fn unknown_command(action: &str) -> Response {
    Response::error(format!(
        "Command not recognized: {}. Type 'help' for available commands.",
        action
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parser::parse;
    use crate::command::response::ResponseKind;

    #[test]
    fn test_verb_table_round_trips() {
        for verb in Verb::ALL {
            assert_eq!(Verb::from_action(verb.name()), verb);
        }
        assert_eq!(Verb::from_action("inv"), Verb::Inventory);
        assert_eq!(Verb::from_action("sudo"), Verb::Unknown);
    }

    #[tokio::test]
    async fn test_unknown_action_is_error_without_mutation() {
        let mut resolver = CommandResolver::new(GameConfig::default());
        let before = resolver.progression().player().clone();
        let world_before = resolver.world().snapshot();

        let response = resolver.resolve(&parse("sudo rm -rf")).await;
        assert_eq!(response.kind, ResponseKind::Error);
        assert!(response.text.starts_with("Command not recognized: sudo."));

        assert_eq!(resolver.progression().player(), &before);
        assert_eq!(resolver.world().snapshot(), world_before);
    }

    #[tokio::test]
    async fn test_empty_input_is_unknown_command() {
        let mut resolver = CommandResolver::new(GameConfig::default());
        let response = resolver.resolve(&parse("")).await;
        assert!(response.is_error());
        assert!(response.text.starts_with("Command not recognized"));
    }

    #[tokio::test]
    async fn test_missing_target_is_usage_error() {
        let mut resolver = CommandResolver::new(GameConfig::default());
        for input in ["scan", "hack", "inject", "inject worm", "trace", "decrypt", "mission accept"] {
            let response = resolver.resolve(&parse(input)).await;
            assert!(response.is_error(), "{} should fail", input);
            assert!(response.text.contains("Usage:"), "{}: {}", input, response.text);
        }
        assert!(resolver.world().list_targets().is_empty());
        assert!(resolver.world().list_injections().is_empty());
    }
}
