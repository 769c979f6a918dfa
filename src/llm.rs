//! Minimal chat-completion client.
//!
//! The wire format is pinned to the OpenAI Chat Completions API: request
//! bodies carry `model`, `messages`, `max_tokens`, `temperature` and
//! `response_format`, and the completion text is read from
//! `choices[0].message.content`. The newer Responses API is not supported.
//!
//! No retries live here. Each caller knows whether a failed completion is
//! fatal (selector recovery) or merely degrades (enrichment), so the client
//! reports failures precisely and leaves policy to them.

use crate::config::LlmConfig;
use crate::error::{Result, ScoutError};
use serde_json::{json, Value};
use std::future::Future;
use std::time::Duration;

/// Sampling temperature for every request; enrichment wants near-
/// deterministic output.
const TEMPERATURE: f64 = 0.3;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can complete a prompt. The production implementation is
/// [`LlmClient`]; tests substitute scripted fakes.
pub trait CompletionClient: Send + Sync {
    /// True when a credential is configured. Callers use this to degrade
    /// up front instead of calling into a guaranteed failure.
    fn has_credential(&self) -> bool;

    /// One prompt-completion round trip, returning trimmed completion text.
    ///
    /// # Errors
    ///
    /// [`ScoutError::MissingCredential`] before any network attempt when no
    /// credential is configured; [`ScoutError::Transport`] on a non-success
    /// status; [`ScoutError::Shape`] on a success response whose body does
    /// not carry completion text where the pinned contract puts it.
    fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP-backed completion client.
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Build a client over process-wide LLM configuration.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScoutError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }
}

impl CompletionClient for LlmClient {
    fn has_credential(&self) -> bool {
        self.config.has_credential()
    }

    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        if !self.has_credential() {
            return Err(ScoutError::MissingCredential(
                "OPENAI_API_KEY is not set; export it or configure llm.api_key".into(),
            ));
        }

        let request = build_request_body(&self.config.model, system, user, max_tokens);
        tracing::trace!(model = %self.config.model, max_tokens, "sending completion request");

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(self.config.api_key.trim())
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoutError::Http(format!("completion request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScoutError::Http(format!("completion response read failed: {e}")))?;

        if !status.is_success() {
            return Err(ScoutError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        extract_completion_text(&body)
    }
}

/// Assemble the pinned request shape.
fn build_request_body(model: &str, system: &str, user: &str, max_tokens: u32) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
        "max_tokens": max_tokens,
        "temperature": TEMPERATURE,
        "response_format": { "type": "json_object" },
    })
}

/// Pull `choices[0].message.content` out of a decoded success body.
///
/// Anything else — undecodable JSON, no choices, missing content — is a
/// shape mismatch carrying the raw body, not a transport failure.
fn extract_completion_text(body: &str) -> Result<String> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| ScoutError::Shape(body.to_string()))?;
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ScoutError::Shape(body.to_string()))
}
