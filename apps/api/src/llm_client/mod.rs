//! Anthropic Messages client for bullet rewrites.
//!
//! Every call runs against one time budget. A rate limit, 5xx reply or connection
//! failure is retried once after a short pause, but only while enough budget is left
//! for a real second attempt. An attempt that times out has used the budget up and is
//! never retried.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
/// A rewritten bullet is one sentence; the JSON envelope adds little.
const MAX_TOKENS: u32 = 512;
const MAX_ATTEMPTS: u32 = 2;
const RETRY_PAUSE: Duration = Duration::from_millis(300);
/// A retry with less budget than this left is not started.
const MIN_RETRY_BUDGET: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Rate limits, server errors and connection failures may succeed on a second try.
    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(e) => !e.is_timeout(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Parse(_) | LlmError::Timeout(_) | LlmError::EmptyContent => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Time the next attempt may use, or `None` when the call should give up.
///
/// The first attempt gets whatever budget remains. A retry pays `RETRY_PAUSE` first and
/// is skipped when less than `MIN_RETRY_BUDGET` would be left after it.
fn next_attempt_window(attempt: u32, remaining: Duration) -> Option<Duration> {
    match attempt {
        0 => Some(remaining),
        n if n >= MAX_ATTEMPTS => None,
        _ => remaining
            .checked_sub(RETRY_PAUSE)
            .filter(|left| *left >= MIN_RETRY_BUDGET),
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    budget: Duration,
}

impl LlmClient {
    /// `budget` bounds a whole call, retry included.
    pub fn new(api_key: String, budget: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            budget,
        })
    }

    /// Calls the model and deserializes its text reply as JSON. The prompt must ask for
    /// JSON; markdown fences around it are tolerated.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
    }

    async fn call(&self, prompt: &str, system: &str) -> Result<MessagesResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };
        let deadline = Instant::now() + self.budget;
        let mut last_error = None;

        for attempt in 0..MAX_ATTEMPTS {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Some(window) = next_attempt_window(attempt, remaining) else {
                break;
            };
            if attempt > 0 {
                warn!(
                    attempt,
                    remaining_ms = window.as_millis() as u64,
                    "Retrying LLM call"
                );
                tokio::time::sleep(RETRY_PAUSE).await;
            }

            match self.attempt(&body, window).await {
                Ok(response) => {
                    debug!(
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "LLM call succeeded"
                    );
                    return Ok(response);
                }
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "LLM call failed");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::Timeout(self.budget)))
    }

    async fn attempt(
        &self,
        body: &MessagesRequest<'_>,
        window: Duration,
    ) -> Result<MessagesResponse, LlmError> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .timeout(window)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { LlmError::Timeout(self.budget) } else { e.into() })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.budget)
            } else {
                e.into()
            }
        })
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let inner = inner.trim_start();
    inner.strip_suffix("```").map(str::trim).unwrap_or(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences() {
        let expected = r#"{"rewrittenBullet": "x"}"#;
        assert_eq!(strip_json_fences("```json\n{\"rewrittenBullet\": \"x\"}\n```"), expected);
        assert_eq!(strip_json_fences("```\n{\"rewrittenBullet\": \"x\"}\n```"), expected);
        assert_eq!(strip_json_fences("  {\"rewrittenBullet\": \"x\"} "), expected);
    }

    #[test]
    fn test_first_attempt_gets_whole_budget() {
        let budget = Duration::from_secs(20);
        assert_eq!(next_attempt_window(0, budget), Some(budget));
    }

    #[test]
    fn test_retry_only_with_enough_budget_left() {
        assert_eq!(
            next_attempt_window(1, Duration::from_secs(19)),
            Some(Duration::from_secs(19) - RETRY_PAUSE)
        );
        // a first attempt that timed out leaves nothing to retry with
        assert_eq!(next_attempt_window(1, Duration::ZERO), None);
        assert_eq!(next_attempt_window(1, Duration::from_secs(2)), None);
        assert_eq!(next_attempt_window(MAX_ATTEMPTS, Duration::from_secs(60)), None);
    }

    #[test]
    fn test_retryable_errors() {
        let api = |status| LlmError::Api {
            status,
            message: String::new(),
        };
        assert!(api(429).is_retryable());
        assert!(api(529).is_retryable());
        assert!(!api(400).is_retryable());
        assert!(!api(401).is_retryable());
        assert!(!LlmError::Timeout(Duration::from_secs(20)).is_retryable());
        assert!(!LlmError::EmptyContent.is_retryable());
    }
}
