//! Axum route handler for the Parse API.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parsing::{parse_sections, render_items, ParsedItem};

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub items: Vec<ParsedItem>,
    /// The items re-rendered as canonical text; parsing it yields the same items.
    pub canonical: String,
}

/// POST /api/v1/resumes/parse
///
/// Returns the experience and project items found in raw resume text, plus their
/// canonical rendering. Text with no recognizable structure yields an empty list.
pub async fn handle_parse(Json(request): Json<ParseRequest>) -> Json<ParseResponse> {
    let items = parse_sections(&request.text);
    debug!(items = items.len(), "Parsed resume text");
    let canonical = render_items(&items);
    Json(ParseResponse { items, canonical })
}
