//! OpenAI-compatible chat-completions classifier.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{Enricher, EnrichmentRequest};
use crate::domain::{ChangeType, Classification, Severity};
use crate::error::EnrichmentError;

const SYSTEM_PROMPT: &str = "You are a competitive intelligence analyst. \
Analyze website changes and classify them. Respond with JSON only, no markdown.";

const TEMPERATURE: f32 = 0.3;

const DEFAULT_RATIONALE: &str = "Change detected";

/// Classifier backed by a chat-completions endpoint that returns one JSON
/// object per call.
#[derive(Debug, Clone)]
pub struct OpenAiEnricher {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiEnricher {
    /// Builds a client for `base_url` (for example `https://api.openai.com/v1`).
    ///
    /// # Errors
    ///
    /// Fails if the API key or model is blank, or the HTTP client cannot
    /// be built.
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing OpenAI API key");
        anyhow::ensure!(!model.trim().is_empty(), "missing OpenAI model name");

        let mut headers = reqwest::header::HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).context("invalid OpenAI API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build OpenAI HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    /// Returns the chat-completions URL this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn user_prompt(request: &EnrichmentRequest) -> String {
    format!(
        "Analyze this website change:\n\n\
URL: {url}\n\
Before: {before}\n\
After: {after}\n\n\
Classify the change:\n\
- changeType: \"product\" (new products/features), \"pricing\" (price changes), or \"other\"\n\
- severity: \"high\" (critical impact), \"medium\" (significant), or \"low\" (minor)\n\
- rationale: 1-2 sentence explanation of why it matters\n\
- recommendedActions: Array of 1-3 actionable recommendations\n\n\
Return JSON:\n\
{{\"changeType\": \"product\" | \"pricing\" | \"other\", \"severity\": \"high\" | \"medium\" | \"low\", \
\"rationale\": \"explanation here\", \"recommendedActions\": [\"action 1\", \"action 2\"]}}",
        url = request.url,
        before = request.before_excerpt,
        after = request.after_excerpt,
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Classification as returned by the model; every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClassification {
    change_type: Option<String>,
    severity: Option<String>,
    rationale: Option<String>,
    recommended_actions: Option<Vec<String>>,
}

fn parse_change_type(raw: &str) -> Option<ChangeType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "product" => Some(ChangeType::Product),
        "pricing" => Some(ChangeType::Pricing),
        "other" => Some(ChangeType::Other),
        _ => None,
    }
}

fn parse_severity(raw: &str) -> Option<Severity> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Some(Severity::Low),
        "medium" => Some(Severity::Medium),
        "high" => Some(Severity::High),
        _ => None,
    }
}

/// Interprets the model's JSON answer.
///
/// Missing or unrecognised fields fall back to `other`, `medium`,
/// `"Change detected"`, and no actions.
///
/// # Errors
///
/// Returns [`EnrichmentError::Malformed`] if `content` is not a JSON
/// object.
pub(crate) fn parse_classification(content: &str) -> Result<Classification, EnrichmentError> {
    let raw: RawClassification =
        serde_json::from_str(content).map_err(|e| EnrichmentError::Malformed(e.to_string()))?;
    Ok(Classification {
        change_type: raw
            .change_type
            .as_deref()
            .and_then(parse_change_type)
            .unwrap_or(ChangeType::Other),
        severity: raw
            .severity
            .as_deref()
            .and_then(parse_severity)
            .unwrap_or(Severity::Medium),
        rationale: raw
            .rationale
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RATIONALE.to_string()),
        recommended_actions: raw.recommended_actions.unwrap_or_default(),
    })
}

#[async_trait]
impl Enricher for OpenAiEnricher {
    async fn classify(
        &self,
        request: &EnrichmentRequest,
    ) -> Result<Classification, EnrichmentError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(request),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EnrichmentError::Malformed("no content in response".to_string()))?;

        parse_classification(&content)
    }
}
