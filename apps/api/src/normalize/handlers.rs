//! Axum route handler for the Normalize API.

use axum::Json;
use serde_json::Value;
use tracing::debug;

use crate::models::resume::CanonicalResume;
use crate::normalize::normalize;

/// POST /api/v1/resumes/normalize
///
/// Accepts any resume-shaped JSON (canonical or a historical editor shape) and
/// returns the canonical document. Never fails on content; only malformed JSON
/// bodies are rejected by the extractor.
pub async fn handle_normalize(Json(raw): Json<Value>) -> Json<CanonicalResume> {
    let resume = normalize(&raw);
    debug!(
        experience = resume.experience.len(),
        projects = resume.projects.len(),
        skills = resume.skills.len(),
        "Normalized resume"
    );
    Json(resume)
}
