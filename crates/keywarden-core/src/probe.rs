//! Completion probe client
//!
//! A probe is one deliberately cheap chat completion request whose only
//! purpose is to check that a candidate credential authorizes access.
//! The candidate travels inside the request, never through process-wide
//! state, so probes for different providers cannot contaminate each
//! other.

use crate::error::{Error, Result};
use crate::registry::ProviderDescriptor;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// Upper bound on generated tokens for a probe call.
pub const PROBE_MAX_TOKENS: u32 = 10;
/// Pinned sampling temperature so probe replies stay cheap and boring.
pub const PROBE_TEMPERATURE: f32 = 0.1;
/// Bounded per-probe timeout; a probe that exceeds it reads as a
/// connection failure.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

const PROBE_PROMPT: &str = "Reply with OK.";

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_ERROR_BODY_CHARS: usize = 1_024;

/// Role of a message in a probe conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
        }
    }
}

/// A single message in a probe conversation.
#[derive(Debug, Clone)]
pub struct ProbeMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ProbeMessage {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Request for one minimal completion call.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Target provider id (selects the wire format)
    pub provider_id: String,
    /// Model to probe with
    pub model: String,
    /// Conversation; a probe carries exactly one user message
    pub messages: Vec<ProbeMessage>,
    /// Output token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Candidate credential, bound per call. For endpoint-bearing
    /// providers this is the base URL.
    pub credential: String,
}

impl ProbeRequest {
    /// Build the minimal probe request for a provider and candidate.
    pub fn minimal(provider: &ProviderDescriptor, credential: impl Into<String>) -> Self {
        Self {
            provider_id: provider.id.to_string(),
            model: provider.test_model.to_string(),
            messages: vec![ProbeMessage::user(PROBE_PROMPT)],
            max_tokens: PROBE_MAX_TOKENS,
            temperature: PROBE_TEMPERATURE,
            credential: credential.into(),
        }
    }
}

/// Response from a completion call: the generated choice texts.
#[derive(Debug, Clone, Default)]
pub struct ProbeResponse {
    pub choices: Vec<String>,
}

impl ProbeResponse {
    /// Whether at least one choice carries non-empty text.
    pub fn has_content(&self) -> bool {
        self.choices.iter().any(|c| !c.trim().is_empty())
    }
}

/// The seam between the validation engine and the network.
#[async_trait]
pub trait CompletionProbe: Send + Sync {
    /// Attempt one minimal completion call.
    async fn complete(&self, request: &ProbeRequest) -> Result<ProbeResponse>;
}

/// HTTP implementation of [`CompletionProbe`] speaking each provider's
/// native wire format.
pub struct HttpProbeClient {
    http: Client,
}

impl HttpProbeClient {
    /// Create a client with the bounded probe timeout.
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| Error::probe(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// OpenAI-compatible chat completions endpoint, used by OpenAI,
    /// Groq, and Ollama's compatibility layer.
    async fn openai_compat(
        &self,
        base_url: &str,
        api_key: Option<&str>,
        request: &ProbeRequest,
    ) -> Result<ProbeResponse> {
        let url = format!("{}/chat/completions", base_url);
        let body = json!({
            "model": request.model,
            "messages": request
                .messages
                .iter()
                .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
                .collect::<Vec<_>>(),
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        let mut http_request = self.http.post(&url).json(&body);
        if let Some(key) = api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            Error::probe_with_provider(format!("request failed: {}", e), &request.provider_id)
        })?;
        let body = read_success_json(response, &request.provider_id).await?;

        let choices = body["choices"]
            .as_array()
            .map(|choices| {
                choices
                    .iter()
                    .filter_map(|c| c["message"]["content"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProbeResponse { choices })
    }

    async fn anthropic(&self, request: &ProbeRequest) -> Result<ProbeResponse> {
        let body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": request
                .messages
                .iter()
                .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
                .collect::<Vec<_>>(),
        });

        let response = self
            .http
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &request.credential)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                Error::probe_with_provider(format!("request failed: {}", e), &request.provider_id)
            })?;
        let body = read_success_json(response, &request.provider_id).await?;

        let choices = body["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|b| b["type"] == "text")
                    .filter_map(|b| b["text"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProbeResponse { choices })
    }

    async fn google(&self, request: &ProbeRequest) -> Result<ProbeResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            GOOGLE_BASE_URL, request.model
        );
        let body = json!({
            "contents": request
                .messages
                .iter()
                .map(|m| json!({ "role": "user", "parts": [{ "text": m.content }] }))
                .collect::<Vec<_>>(),
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": request.temperature,
            },
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", request.credential.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                Error::probe_with_provider(format!("request failed: {}", e), &request.provider_id)
            })?;
        let body = read_success_json(response, &request.provider_id).await?;

        let choices = body["candidates"]
            .as_array()
            .map(|candidates| {
                candidates
                    .iter()
                    .filter_map(|c| {
                        let parts = c["content"]["parts"].as_array()?;
                        let text: String = parts
                            .iter()
                            .filter_map(|p| p["text"].as_str())
                            .collect();
                        Some(text)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProbeResponse { choices })
    }
}

#[async_trait]
impl CompletionProbe for HttpProbeClient {
    async fn complete(&self, request: &ProbeRequest) -> Result<ProbeResponse> {
        debug!(
            provider = %request.provider_id,
            model = %request.model,
            "sending probe request"
        );

        match request.provider_id.as_str() {
            "openai" => {
                self.openai_compat(OPENAI_BASE_URL, Some(&request.credential), request)
                    .await
            }
            "groq" => {
                self.openai_compat(GROQ_BASE_URL, Some(&request.credential), request)
                    .await
            }
            "ollama" => {
                // The credential slot holds the server URL; Ollama's
                // OpenAI compatibility layer lives under /v1.
                let base = format!("{}/v1", request.credential.trim_end_matches('/'));
                self.openai_compat(&base, None, request).await
            }
            "anthropic" => self.anthropic(request).await,
            "google" => self.google(request).await,
            other => Err(Error::probe_with_provider(
                format!("no probe transport for provider '{}'", other),
                other,
            )),
        }
    }
}

/// Turn a non-2xx response into a probe error carrying the status and a
/// sanitized body, or parse the success body as JSON.
async fn read_success_json(response: reqwest::Response, provider: &str) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::probe_with_provider(
            format!("API error (status {}): {}", status, sanitize_error_body(&body)),
            provider,
        ));
    }

    response
        .json()
        .await
        .map_err(|e| Error::probe_with_provider(format!("failed to parse response: {}", e), provider))
}

/// Trim and truncate an error body before it is embedded in a message.
fn sanitize_error_body(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty error response body>".to_string();
    }

    let char_count = trimmed.chars().count();
    if char_count <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }

    let truncated: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!(
        "{}... [truncated {} chars]",
        truncated,
        char_count - MAX_ERROR_BODY_CHARS
    )
}
