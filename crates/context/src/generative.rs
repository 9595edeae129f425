//! Generative service client
//!
//! Sends a single POST per prompt and extracts the answer text using an
//! ordered list of response-shape strategies, so callers never depend on one
//! provider's schema.

use async_trait::async_trait;
use drishti_common::config::GenerativeConfig;
use drishti_common::errors::{AppError, Result};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Result of one generative call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Whether the service answered successfully
    pub success: bool,

    /// Answer text, or a human-readable error on failure
    pub text: String,

    /// Parsed response body, or `{"error": ...}` on failure
    pub raw: Value,
}

impl GenerationOutcome {
    pub fn failure(err: &AppError) -> Self {
        Self {
            success: false,
            text: format!("Error calling generative API: {}", err),
            raw: json!({ "error": err.to_string() }),
        }
    }
}

/// Trait for answer generation
///
/// Implementations must never panic or return early with an error: every
/// failure is reported through [`GenerationOutcome::failure`].
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, settings: &GenerativeConfig) -> GenerationOutcome;
}

/// Where an answer string may live in a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// `{"text": "..."}`
    TopLevelText,
    /// `{"output": {"text": "..."}}`
    OutputText,
    /// `{"choices": [{"text": "..."}]}`
    FirstChoiceText,
    /// `{"candidates": [{"content": {"parts": [{"text": "..."}]}}]}`
    CandidateParts,
    /// The body itself is a JSON string
    WholeString,
}

impl ExtractionStrategy {
    /// Strategies in the order they are tried
    pub const ORDER: [ExtractionStrategy; 5] = [
        ExtractionStrategy::TopLevelText,
        ExtractionStrategy::OutputText,
        ExtractionStrategy::FirstChoiceText,
        ExtractionStrategy::CandidateParts,
        ExtractionStrategy::WholeString,
    ];

    /// Non-empty answer text found by this strategy
    pub fn extract(self, body: &Value) -> Option<String> {
        let text = match self {
            ExtractionStrategy::TopLevelText => body.get("text"),
            ExtractionStrategy::OutputText => body.get("output").and_then(|o| o.get("text")),
            ExtractionStrategy::FirstChoiceText => body
                .get("choices")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("text")),
            ExtractionStrategy::CandidateParts => body.pointer("/candidates/0/content/parts/0/text"),
            ExtractionStrategy::WholeString => Some(body),
        };

        text.and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// First strategy that yields text, with the strategy that produced it
pub fn extract_answer(body: &Value) -> Option<(ExtractionStrategy, String)> {
    ExtractionStrategy::ORDER
        .iter()
        .find_map(|strategy| strategy.extract(body).map(|text| (*strategy, text)))
}

/// Request body in the Gemini `generateContent` shape
pub fn request_body(prompt: &str) -> Value {
    json!({ "contents": [{ "parts": [{ "text": prompt }] }] })
}

/// HTTP client for a Gemini-compatible endpoint or wrapper
pub struct GeminiClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a client with a fixed request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, timeout })
    }

    /// Perform the call, returning the answer text and parsed body
    pub async fn call(&self, prompt: &str, settings: &GenerativeConfig) -> Result<(String, Value)> {
        let url = settings.resolved_url();

        let mut request = self.client.post(&url).json(&request_body(prompt));
        if let Some(key) = settings.api_key() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(AppError::Upstream {
                message: format!("HTTP {}", status),
            });
        }

        let body: Value = serde_json::from_str(&body_text).map_err(|e| AppError::Upstream {
            message: format!("malformed response: {}", e),
        })?;

        let text = match extract_answer(&body) {
            Some((strategy, text)) => {
                debug!(?strategy, model = %settings.model, "Answer extracted");
                text
            }
            None => body_text,
        };

        Ok((text, body))
    }

    fn transport_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::GenerationTimeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            AppError::HttpClient(err)
        }
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str, settings: &GenerativeConfig) -> GenerationOutcome {
        match self.call(prompt, settings).await {
            Ok((text, raw)) => GenerationOutcome {
                success: true,
                text,
                raw,
            },
            Err(e) => GenerationOutcome::failure(&e),
        }
    }
}
