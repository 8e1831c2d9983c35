//! End-to-end command scenarios
//!
//! Drives the public resolver and session APIs the way the terminal does:
//! raw input in, response out. Deterministic runs use a constant RNG;
//! statistical runs use seeded ChaCha streams.

use async_trait::async_trait;
use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use roguecode::command::{parse, CommandResolver, ResponseKind, ResponsePayload, ShellAction};
use roguecode::core::{GameConfig, Result, RogueError};
use roguecode::core::types::{MissionId, TargetId};
use roguecode::llm::{Enrichment, EnrichmentProvider, ScanRequest};
use roguecode::session::{MemoryStore, SaveGame, SaveStore, Session};
use roguecode::world::mission::{MissionStatus, MissionType};

fn resolver() -> CommandResolver {
    CommandResolver::with_rng(GameConfig::default(), Box::new(StepRng::new(0, 0)))
}

struct ScriptedEnrichment;

#[async_trait]
impl EnrichmentProvider for ScriptedEnrichment {
    async fn scan_narrative(&self, request: &ScanRequest) -> Result<Enrichment> {
        Ok(Enrichment::Text(format!("Chatter around {} went quiet.", request.target)))
    }

    async fn mission_briefing(&self, _mission_type: MissionType, difficulty: u8) -> Result<Enrichment> {
        Ok(Enrichment::Text(format!("Handler rates this a {}.", difficulty)))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct BrokenEnrichment;

#[async_trait]
impl EnrichmentProvider for BrokenEnrichment {
    async fn scan_narrative(&self, _request: &ScanRequest) -> Result<Enrichment> {
        Err(RogueError::LlmError("connection reset".into()))
    }

    async fn mission_briefing(&self, _mission_type: MissionType, _difficulty: u8) -> Result<Enrichment> {
        Err(RogueError::LlmError("connection reset".into()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

struct HangingEnrichment;

#[async_trait]
impl EnrichmentProvider for HangingEnrichment {
    async fn scan_narrative(&self, _request: &ScanRequest) -> Result<Enrichment> {
        std::future::pending().await
    }

    async fn mission_briefing(&self, _mission_type: MissionType, _difficulty: u8) -> Result<Enrichment> {
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "hanging"
    }
}

// ============================================================================
// Intrusion
// ============================================================================

#[tokio::test]
async fn scan_with_vulns_reports_address_and_records_target() {
    let mut resolver = resolver();
    let response = resolver.resolve(&parse("scan alpha --vulns")).await;

    assert_eq!(response.kind, ResponseKind::Success);
    assert!(response.text.starts_with("Scan results for alpha:"));
    assert!(response.text.lines().any(|l| l.starts_with("IP: ")));

    let target = resolver
        .world()
        .get_target(&TargetId::new("alpha"))
        .expect("scanned target is stored");
    assert!(!target.hacked);
}

#[test]
fn quiet_workstation_hack_succeeds_about_one_in_ten() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let trials = 1000;
    let successes = (0..trials)
        .filter(|seed| {
            let mut resolver = CommandResolver::with_rng(
                GameConfig::default(),
                Box::new(ChaCha8Rng::seed_from_u64(*seed)),
            );
            let response = rt.block_on(resolver.resolve(&parse("hack workstation --quiet")));
            response.action == Some(ShellAction::HackSuccess)
        })
        .count();

    let rate = successes as f64 / trials as f64;
    assert!((0.07..=0.13).contains(&rate), "rate = {}", rate);
}

#[test]
fn injected_payload_raises_hack_success_rate() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let trials = 600;

    let rate = |setup: Option<&str>| {
        let wins = (0..trials)
            .filter(|seed| {
                let mut resolver = resolver();
                if let Some(line) = setup {
                    // Constant RNG: the injection always lands
                    rt.block_on(resolver.resolve(&parse(line)));
                }
                resolver.set_rng(Box::new(ChaCha8Rng::seed_from_u64(*seed)));
                let response = rt.block_on(resolver.resolve(&parse("hack database")));
                response.action == Some(ShellAction::HackSuccess)
            })
            .count();
        wins as f64 / trials as f64
    };

    let plain = rate(None);
    let injected = rate(Some("inject backdoor database"));
    assert!(injected > plain + 0.1, "plain = {}, injected = {}", plain, injected);
}

// ============================================================================
// Missions and progression
// ============================================================================

#[tokio::test]
async fn mission_lifecycle_pays_rewards_exactly_once() {
    let mut resolver = resolver();

    let generated = resolver.resolve(&parse("mission generate")).await;
    let mission = match generated.payload {
        Some(ResponsePayload::Mission(m)) => m,
        other => panic!("expected mission payload, got {:?}", other),
    };
    assert_eq!(mission.status, MissionStatus::Available);

    let accept = resolver.resolve(&parse(&format!("mission accept {}", mission.id))).await;
    assert_eq!(accept.action, Some(ShellAction::MissionAccepted));

    let before = resolver.progression().player().clone();
    let before_lifetime = resolver.progression().lifetime_xp();

    let complete = resolver.resolve(&parse(&format!("mission complete {}", mission.id))).await;
    assert_eq!(complete.action, Some(ShellAction::MissionCompleted));

    let after = resolver.progression().player().clone();
    assert_eq!(after.credits, before.credits + mission.credit_reward);
    assert_eq!(after.reputation, before.reputation + mission.reputation_reward);
    assert_eq!(resolver.progression().lifetime_xp(), before_lifetime + mission.xp_reward);
    assert!(after.is_consistent());
    assert!(after.completed_missions.contains(&mission.id));

    let again = resolver.resolve(&parse(&format!("mission complete {}", mission.id))).await;
    assert!(again.is_error());
    assert_eq!(resolver.progression().player(), &after);
    assert_eq!(
        resolver.world().get_mission(&mission.id).map(|m| m.status),
        Some(MissionStatus::Completed)
    );
}

#[tokio::test]
async fn reset_stats_restores_starting_numbers() {
    let mut resolver = resolver();
    resolver.resolve(&parse("hack mainframe")).await;
    resolver.resolve(&parse("hack gateway")).await;
    assert!(resolver.progression().player().credits > 1000);

    let response = resolver.resolve(&parse("reset stats")).await;
    assert_eq!(response.kind, ResponseKind::Success);

    let p = resolver.progression().player();
    assert_eq!((p.level, p.xp, p.xp_to_next_level), (1, 0, 100));
    assert_eq!((p.credits, p.reputation), (1000, 0));
}

#[tokio::test]
async fn empty_and_unknown_input_change_nothing() {
    let mut resolver = resolver();
    let player = resolver.progression().player().clone();
    let world = resolver.world().snapshot();

    let empty = resolver.resolve(&parse("   ")).await;
    assert!(empty.is_error());
    assert!(empty.text.contains("(empty)"));

    let unknown = resolver.resolve(&parse("dance --wildly")).await;
    assert!(unknown.is_error());
    assert!(unknown.text.starts_with("Command not recognized: dance."));

    assert_eq!(resolver.progression().player(), &player);
    assert_eq!(resolver.world().snapshot(), world);
}

#[tokio::test]
async fn missing_arguments_report_usage() {
    let mut resolver = resolver();
    for (line, usage) in [
        ("scan", "Usage: scan"),
        ("hack", "Usage: hack"),
        ("inject keylogger", "Usage: inject"),
        ("mission accept", "Usage: mission accept"),
    ] {
        let response = resolver.resolve(&parse(line)).await;
        assert!(response.is_error(), "{} should fail", line);
        assert!(response.text.contains(usage), "{}: {}", line, response.text);
    }
}

// ============================================================================
// Enrichment
// ============================================================================

#[tokio::test]
async fn enrichment_text_is_appended_to_local_results() {
    let mut resolver = CommandResolver::with_parts(
        GameConfig::default(),
        Box::new(ScriptedEnrichment),
        Box::new(StepRng::new(0, 0)),
    );

    let scan = resolver.resolve(&parse("scan relay")).await;
    assert!(scan.text.starts_with("Scan results for relay:"));
    assert!(scan.text.ends_with("Chatter around relay went quiet."));

    let mission = resolver.resolve(&parse("mission generate")).await;
    assert!(mission.text.contains("Intel:\nHandler rates this a "));
}

#[tokio::test]
async fn failing_enrichment_falls_back_to_local_text() {
    let mut resolver = CommandResolver::with_parts(
        GameConfig::default(),
        Box::new(BrokenEnrichment),
        Box::new(StepRng::new(0, 0)),
    );

    let scan = resolver.resolve(&parse("scan relay")).await;
    assert_eq!(scan.kind, ResponseKind::Success);
    assert!(scan.text.lines().any(|l| l.starts_with("IP: ")));

    let mission = resolver.resolve(&parse("mission generate")).await;
    assert_eq!(mission.kind, ResponseKind::Success);
    assert!(!mission.text.contains("Intel:"));
    assert_eq!(resolver.world().mission_count(), 1);
}

#[tokio::test]
async fn stalled_enrichment_times_out_to_local_text() {
    let config = GameConfig {
        enrichment_timeout_ms: 50,
        ..GameConfig::default()
    };
    let mut resolver = CommandResolver::with_parts(
        config,
        Box::new(HangingEnrichment),
        Box::new(StepRng::new(0, 0)),
    );

    let scan = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        resolver.resolve(&parse("scan relay")),
    )
    .await
    .expect("scan must not wait on a stalled provider");
    assert_eq!(scan.kind, ResponseKind::Success);
    assert!(scan.text.starts_with("Scan results for relay:"));
    assert!(scan.text.lines().any(|l| l.starts_with("IP: ")));

    let mission = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        resolver.resolve(&parse("mission generate")),
    )
    .await
    .expect("mission generate must not wait on a stalled provider");
    assert_eq!(mission.kind, ResponseKind::Success);
    assert!(!mission.text.contains("Intel:"));
    assert_eq!(resolver.world().mission_count(), 1);
}

// ============================================================================
// Session and persistence
// ============================================================================

#[tokio::test]
async fn session_save_restores_into_fresh_session() {
    let mut first = Session::new(resolver()).with_store(Box::new(MemoryStore::new()));
    first.submit("hack mail-server").await;
    first.submit("mission generate").await;
    first.submit("mission accept mission-1").await;
    first.autosave().unwrap();

    let save = SaveGame::new(
        first.resolver().progression().player().clone(),
        first.resolver().world().snapshot(),
    );
    let mut store = MemoryStore::new();
    store.save(&save).unwrap();

    let mut second = Session::new(resolver()).with_store(Box::new(store));
    assert!(second.load_saved().unwrap());

    let restored = second.resolver();
    assert_eq!(restored.progression().player(), first.resolver().progression().player());
    assert_eq!(restored.world().snapshot(), first.resolver().world().snapshot());
    assert_eq!(
        restored
            .world()
            .get_mission(&MissionId::from("mission-1"))
            .map(|m| m.status),
        Some(MissionStatus::Active)
    );

    // Id allocation continues after the restored missions
    second.submit("mission generate").await;
    assert!(second
        .resolver()
        .world()
        .get_mission(&MissionId::from("mission-2"))
        .is_some());
}
