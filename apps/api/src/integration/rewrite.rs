//! Rewrite service seam: a pluggable, trait-based backend that rewrites one bullet
//! around a set of keywords.
//!
//! `AppState` holds an `Arc<dyn RewriteService>`, chosen at startup from config:
//! `LlmRewriter` when an API key is present, `DisabledRewriter` otherwise. Any failure
//! is recovered by the session through the local fallback generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::integration::prompts::{build_rewrite_prompt, REWRITE_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

// ────────────────────────────────────────────────────────────────────────────
// Request / response models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteRequest {
    /// The bullet being enhanced, or a synthesized seed when composing a new one.
    pub original_bullet: String,
    pub keywords: Vec<String>,
    /// Item title and section kind, e.g. "Acme Corp (experience)".
    pub context_hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteResponse {
    #[serde(alias = "rewrittenBullet")]
    pub rewritten_bullet: String,
}

/// Coarse failure classes reported to the caller alongside a fallback suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    ServiceUnavailable,
    MalformedResponse,
    NotConfigured,
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("rewrite service unavailable: {0}")]
    Unavailable(String),

    #[error("rewrite service returned an unusable response: {0}")]
    Malformed(String),

    #[error("no rewrite service configured")]
    NotConfigured,
}

impl RewriteError {
    pub fn cause(&self) -> FailureCause {
        match self {
            RewriteError::Unavailable(_) => FailureCause::ServiceUnavailable,
            RewriteError::Malformed(_) => FailureCause::MalformedResponse,
            RewriteError::NotConfigured => FailureCause::NotConfigured,
        }
    }
}

impl From<LlmError> for RewriteError {
    fn from(e: LlmError) -> Self {
        match &e {
            LlmError::Parse(_) | LlmError::EmptyContent => RewriteError::Malformed(e.to_string()),
            _ => RewriteError::Unavailable(e.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap rewrite backends without touching the session or handlers.
#[async_trait]
pub trait RewriteService: Send + Sync {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteResponse, RewriteError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmRewriter
// ────────────────────────────────────────────────────────────────────────────

/// Rewrites through the shared LLM client. The client's time budget bounds each call.
pub struct LlmRewriter {
    llm: LlmClient,
}

impl LlmRewriter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl RewriteService for LlmRewriter {
    async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteResponse, RewriteError> {
        let prompt = build_rewrite_prompt(
            &request.original_bullet,
            &request.keywords,
            &request.context_hint,
        );

        let response: RewriteResponse = self.llm.call_json(&prompt, REWRITE_SYSTEM).await?;

        if response.rewritten_bullet.trim().is_empty() {
            return Err(RewriteError::Malformed("empty rewrittenBullet".to_string()));
        }

        debug!(
            chars = response.rewritten_bullet.len(),
            "LLM rewrite succeeded"
        );
        Ok(response)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DisabledRewriter
// ────────────────────────────────────────────────────────────────────────────

/// Backend used when no API key is configured. Always defers to the fallback generator.
pub struct DisabledRewriter;

#[async_trait]
impl RewriteService for DisabledRewriter {
    async fn rewrite(&self, _request: &RewriteRequest) -> Result<RewriteResponse, RewriteError> {
        Err(RewriteError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_accepts_camel_case_field() {
        let parsed: RewriteResponse =
            serde_json::from_str(r#"{"rewrittenBullet": "Shipped Rust services"}"#).unwrap();
        assert_eq!(parsed.rewritten_bullet, "Shipped Rust services");
    }

    #[test]
    fn test_llm_errors_map_to_causes() {
        let parse_err = serde_json::from_str::<RewriteResponse>("nope").unwrap_err();
        assert_eq!(
            RewriteError::from(LlmError::Parse(parse_err)).cause(),
            FailureCause::MalformedResponse
        );
        assert_eq!(
            RewriteError::from(LlmError::EmptyContent).cause(),
            FailureCause::MalformedResponse
        );
        assert_eq!(
            RewriteError::from(LlmError::Timeout(std::time::Duration::from_secs(20))).cause(),
            FailureCause::ServiceUnavailable
        );
    }

    #[tokio::test]
    async fn test_disabled_rewriter_always_fails() {
        let request = RewriteRequest {
            original_bullet: "Built things".to_string(),
            keywords: vec!["Rust".to_string()],
            context_hint: "Acme Corp (experience)".to_string(),
        };
        let err = DisabledRewriter.rewrite(&request).await.unwrap_err();
        assert_eq!(err.cause(), FailureCause::NotConfigured);
    }
}
