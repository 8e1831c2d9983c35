//! Async HTTP client for chat-completion APIs
//!
//! Speaks both the Anthropic messages format and the OpenAI-compatible
//! format (Groq, DeepSeek, OpenAI, ...). The wire format is picked from the
//! endpoint URL. Only used for narration; no game state depends on a reply.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, RogueError};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Wire format spoken by the configured endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

impl ApiFormat {
    fn for_url(url: &str) -> Self {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }
}

/// Sampling settings for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for Sampling {
    fn default() -> Self {
        // A few short paragraphs at most
        Self {
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

pub struct LlmClient {
    http: Client,
    api_key: String,
    endpoint: String,
    model: String,
    format: ApiFormat,
}

impl LlmClient {
    pub fn new(api_key: String, endpoint: String, model: String) -> Self {
        let format = ApiFormat::for_url(&endpoint);
        Self {
            http: Client::new(),
            api_key,
            endpoint,
            model,
            format,
        }
    }

    /// Build from `LLM_API_KEY` (required), `LLM_API_URL` and `LLM_MODEL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("LLM_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RogueError::LlmError("LLM_API_KEY not set".into()))?;
        let endpoint = lookup("LLM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let model = lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        Ok(Self::new(api_key, endpoint, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.format
    }

    /// One system + user exchange; returns the first text block of the reply
    pub async fn complete(&self, system: &str, user: &str, sampling: Sampling) -> Result<String> {
        let text = match self.format {
            ApiFormat::Anthropic => {
                let body = ChatRequest {
                    model: &self.model,
                    max_tokens: sampling.max_tokens,
                    temperature: sampling.temperature,
                    system: Some(system),
                    messages: vec![Turn::user(user)],
                };
                let request = self
                    .http
                    .post(&self.endpoint)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION);
                let reply: AnthropicReply = send(request, &body).await?;
                reply.content.into_iter().next().map(|block| block.text)
            }
            ApiFormat::OpenAI => {
                let body = ChatRequest {
                    model: &self.model,
                    max_tokens: sampling.max_tokens,
                    temperature: sampling.temperature,
                    system: None,
                    messages: vec![Turn::system(system), Turn::user(user)],
                };
                let request = self.http.post(&self.endpoint).bearer_auth(&self.api_key);
                let reply: OpenAIReply = send(request, &body).await?;
                reply.choices.into_iter().next().map(|choice| choice.message.content)
            }
        };

        text.ok_or_else(|| RogueError::LlmError("Empty response".into()))
    }
}

async fn send<B: Serialize, R: DeserializeOwned>(request: RequestBuilder, body: &B) -> Result<R> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| RogueError::LlmError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(RogueError::LlmError(format!("API error {}: {}", status, detail)));
    }

    response
        .json()
        .await
        .map_err(|e| RogueError::LlmError(e.to_string()))
}

/// Request body shared by both formats; Anthropic carries the system prompt
/// as a field, OpenAI as the first turn.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Turn<'a>>,
}

#[derive(Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> Turn<'a> {
    fn system(content: &'a str) -> Self {
        Self { role: "system", content }
    }

    fn user(content: &'a str) -> Self {
        Self { role: "user", content }
    }
}

#[derive(Deserialize)]
struct AnthropicReply {
    content: Vec<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    text: String,
}

#[derive(Deserialize)]
struct OpenAIReply {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_endpoint() {
        let groq = LlmClient::new(
            "test-key".into(),
            "https://api.groq.com/openai/v1/chat/completions".into(),
            "llama3-70b-8192".into(),
        );
        assert_eq!(groq.model(), "llama3-70b-8192");
        assert_eq!(groq.api_format(), &ApiFormat::OpenAI);

        let anthropic = LlmClient::new("k".into(), DEFAULT_API_URL.into(), DEFAULT_MODEL.into());
        assert_eq!(anthropic.api_format(), &ApiFormat::Anthropic);
    }

    #[test]
    fn test_missing_or_blank_key_is_rejected() {
        assert!(matches!(LlmClient::from_lookup(|_| None), Err(RogueError::LlmError(_))));
        let blank = LlmClient::from_lookup(|k| (k == "LLM_API_KEY").then(|| "  ".to_string()));
        assert!(blank.is_err());
    }

    #[test]
    fn test_lookup_defaults_and_overrides() {
        let defaults = LlmClient::from_lookup(|k| (k == "LLM_API_KEY").then(|| "k".to_string())).unwrap();
        assert_eq!(defaults.model(), DEFAULT_MODEL);
        assert_eq!(defaults.api_format(), &ApiFormat::Anthropic);

        let groq = LlmClient::from_lookup(|k| match k {
            "LLM_API_KEY" => Some("k".into()),
            "LLM_API_URL" => Some("https://api.groq.com/openai/v1/chat/completions".into()),
            "LLM_MODEL" => Some("llama3-70b-8192".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(groq.model(), "llama3-70b-8192");
        assert_eq!(groq.api_format(), &ApiFormat::OpenAI);
    }

    #[test]
    fn test_system_prompt_placement() {
        let anthropic = ChatRequest {
            model: "m",
            max_tokens: 10,
            temperature: 0.5,
            system: Some("be terse"),
            messages: vec![Turn::user("hi")],
        };
        let json = serde_json::to_value(&anthropic).unwrap();
        assert_eq!(json["system"], "be terse");
        assert_eq!(json["messages"][0]["role"], "user");

        let openai = ChatRequest {
            model: "m",
            max_tokens: 10,
            temperature: 0.5,
            system: None,
            messages: vec![Turn::system("be terse"), Turn::user("hi")],
        };
        let json = serde_json::to_value(&openai).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn test_anthropic_reply_shape() {
        let reply: AnthropicReply =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"Signal lost."}]}"#).unwrap();
        assert_eq!(reply.content[0].text, "Signal lost.");
    }
}
