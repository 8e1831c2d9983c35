//! Narrative enrichment providers
//!
//! An enrichment provider may add prose to scan results and mission
//! briefings. It is always optional: callers render local content first and
//! only append what the provider returns.

use async_trait::async_trait;
use std::time::Duration;

use crate::core::error::{Result, RogueError};
use crate::llm::client::{LlmClient, Sampling};
use crate::world::mission::MissionType;

/// Marker some providers return instead of failing
pub const UNAVAILABLE_MARKER: &str = "AI response unavailable";

/// Outcome of an enrichment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Text(String),
    Unavailable,
}

impl Enrichment {
    /// Normalize raw provider output; blank text and the unavailable marker
    /// both count as no enrichment.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(UNAVAILABLE_MARKER) {
            Enrichment::Unavailable
        } else {
            Enrichment::Text(trimmed.to_string())
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Enrichment::Text(text) => Some(text),
            Enrichment::Unavailable => None,
        }
    }
}

/// What is known about a scan when narration is requested
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub target: String,
    pub deep: bool,
    pub vulns: bool,
    /// Locally generated facts the narration must agree with
    pub facts: String,
}

/// Source of optional narrative text.
///
/// `Ok(Enrichment::Unavailable)` is the normal "nothing to add" answer.
/// `Err` is reserved for transport failures and timeouts; callers log it and
/// carry on with local content.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    async fn scan_narrative(&self, request: &ScanRequest) -> Result<Enrichment>;

    async fn mission_briefing(&self, mission_type: MissionType, difficulty: u8) -> Result<Enrichment>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Provider used when no LLM is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineEnrichment;

#[async_trait]
impl EnrichmentProvider for OfflineEnrichment {
    async fn scan_narrative(&self, _request: &ScanRequest) -> Result<Enrichment> {
        Ok(Enrichment::Unavailable)
    }

    async fn mission_briefing(&self, _mission_type: MissionType, _difficulty: u8) -> Result<Enrichment> {
        Ok(Enrichment::Unavailable)
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

/// LLM-backed provider with a hard per-request deadline
pub struct LlmEnrichment {
    client: LlmClient,
    timeout: Duration,
}

impl LlmEnrichment {
    pub fn new(client: LlmClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn ask(&self, system: &str, user: &str, temperature: f32) -> Result<Enrichment> {
        let sampling = Sampling {
            temperature,
            ..Sampling::default()
        };
        let raw = tokio::time::timeout(self.timeout, self.client.complete(system, user, sampling))
            .await
            .map_err(|_| RogueError::LlmError(format!("timed out after {:?}", self.timeout)))??;
        Ok(Enrichment::from_raw(&raw))
    }
}

#[async_trait]
impl EnrichmentProvider for LlmEnrichment {
    async fn scan_narrative(&self, request: &ScanRequest) -> Result<Enrichment> {
        let (system, user) = scan_prompt(request);
        self.ask(&system, &user, 0.7).await
    }

    async fn mission_briefing(&self, mission_type: MissionType, difficulty: u8) -> Result<Enrichment> {
        let (system, user) = briefing_prompt(mission_type, difficulty);
        self.ask(&system, &user, 0.8).await
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

pub fn scan_prompt(request: &ScanRequest) -> (String, String) {
    let scan_type = if request.deep { "deep" } else { "standard" };
    let vulns = if request.vulns {
        "with vulnerability assessment"
    } else {
        "without vulnerability assessment"
    };

    let system = format!(
        "You are a network scanning tool in a cyberpunk hacking game called RogueCode.\n\
         Describe the scan in two or three terse terminal-style sentences.\n\
         Stay consistent with these facts and do not invent new addresses or ports:\n{}",
        request.facts
    );
    let user = format!(
        "Narrate a {} scan of \"{}\" {}.",
        scan_type, request.target, vulns
    );
    (system, user)
}

pub fn briefing_prompt(mission_type: MissionType, difficulty: u8) -> (String, String) {
    let system = format!(
        "You are an AI mission handler in a cyberpunk hacking game called RogueCode.\n\
         Write 2-3 sentences of background for the mission.\n\
         Difficulty: {}/5. Keep the tone serious but with cyberpunk flair.",
        difficulty
    );
    let user = format!(
        "Give background for a difficulty {} {} mission.",
        difficulty, mission_type
    );
    (system, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_filters_unusable_output() {
        assert_eq!(Enrichment::from_raw("   \n"), Enrichment::Unavailable);
        assert_eq!(
            Enrichment::from_raw("AI response unavailable: API key is missing"),
            Enrichment::Unavailable
        );
        assert_eq!(
            Enrichment::from_raw("  Handshake spoofed.  "),
            Enrichment::Text("Handshake spoofed.".into())
        );
    }

    #[tokio::test]
    async fn test_offline_is_always_unavailable() {
        let provider = OfflineEnrichment;
        let request = ScanRequest {
            target: "alpha".into(),
            deep: false,
            vulns: true,
            facts: String::new(),
        };
        assert_eq!(provider.scan_narrative(&request).await.unwrap(), Enrichment::Unavailable);
        assert_eq!(
            provider.mission_briefing(MissionType::Sabotage, 3).await.unwrap(),
            Enrichment::Unavailable
        );
    }

    #[tokio::test]
    async fn test_silent_endpoint_hits_deadline() {
        // Local listener that accepts and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = LlmClient::new("k".into(), format!("http://{}/v1/chat", addr), "m".into());
        let provider = LlmEnrichment::new(client, Duration::from_millis(100));
        let started = std::time::Instant::now();
        let result = provider.mission_briefing(MissionType::Defense, 2).await;

        match result {
            Err(RogueError::LlmError(msg)) => assert!(msg.contains("timed out"), "{}", msg),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_scan_prompt_carries_facts() {
        let request = ScanRequest {
            target: "alpha".into(),
            deep: true,
            vulns: false,
            facts: "ip=192.168.1.4".into(),
        };
        let (system, user) = scan_prompt(&request);
        assert!(system.contains("ip=192.168.1.4"));
        assert!(user.contains("deep scan"));
    }
}
