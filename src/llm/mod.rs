//! Optional LLM narration

pub mod client;
pub mod enrichment;

pub use client::{ApiFormat, LlmClient, Sampling};
pub use enrichment::{Enrichment, EnrichmentProvider, LlmEnrichment, OfflineEnrichment, ScanRequest};
