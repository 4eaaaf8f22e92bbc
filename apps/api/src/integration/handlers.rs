//! Axum route handlers for the Keyword Integration API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::integration::keywords::missing_keywords;
use crate::integration::session::{
    EditAction, KeywordEditSession, KeywordToggle, SessionView, SuggestionNotice,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MissingKeywordsRequest {
    pub keywords: Vec<String>,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct MissingKeywordsResponse {
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub resume_text: String,
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: EditAction,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub draft: String,
}

#[derive(Debug, Deserialize)]
pub struct KeywordRequest {
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordToggleResponse {
    pub outcome: KeywordToggle,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub notice: SuggestionNotice,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub resume_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/keywords/missing
///
/// Filters a ranked keyword list down to keywords the resume does not mention.
pub async fn handle_missing_keywords(
    Json(request): Json<MissingKeywordsRequest>,
) -> Json<MissingKeywordsResponse> {
    Json(MissingKeywordsResponse {
        keywords: missing_keywords(&request.keywords, &request.resume_text),
    })
}

/// POST /api/v1/keyword-sessions
///
/// Opens a session over the posted text, discarding any session already open.
pub async fn handle_open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let session = KeywordEditSession::open(&request.resume_text, &request.keyword)?;
    let view = session.view();
    state.sessions.open(session).await;
    info!(
        session_id = %view.id,
        items = view.items.len(),
        "Opened keyword session"
    );
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/keyword-sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state.sessions.with_session(id, |s| Ok(s.view())).await?;
    Ok(Json(view))
}

/// DELETE /api/v1/keyword-sessions/:id
pub async fn handle_cancel_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.close(id).await?;
    info!(session_id = %id, "Cancelled keyword session");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/keyword-sessions/:id/item
pub async fn handle_select_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.select_item(request.index)?;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/keyword-sessions/:id/action
///
/// `enhance` on an item without bullets answers 409 `NO_BULLETS_TO_ENHANCE`; the
/// caller should retry with `new`.
pub async fn handle_select_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.select_action(request.action)?;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/keyword-sessions/:id/bullet
pub async fn handle_select_bullet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.select_bullet(request.index)?;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/keyword-sessions/:id/draft
pub async fn handle_set_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.set_draft(&request.draft)?;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/keyword-sessions/:id/keywords
///
/// Toggles a keyword. Hitting the cap or touching the origin keyword is reported in
/// `outcome`, not as an error.
pub async fn handle_toggle_keyword(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<KeywordRequest>,
) -> Result<Json<KeywordToggleResponse>, AppError> {
    let response = state
        .sessions
        .with_session(id, |s| {
            let outcome = s.toggle_keyword(&request.keyword)?;
            Ok(KeywordToggleResponse {
                outcome,
                session: s.view(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/keyword-sessions/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.back()?;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/keyword-sessions/:id/suggest
///
/// Takes a ticket under the store lock, calls the rewrite service without it, then
/// lands the result only if the session has not moved on in the meantime.
pub async fn handle_suggest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let ticket = state
        .sessions
        .with_session(id, |s| s.begin_suggestion())
        .await?;

    let outcome = state
        .rewriter
        .rewrite(&ticket.request)
        .await
        .map(|r| r.rewritten_bullet);

    let response = state
        .sessions
        .with_session(id, |s| {
            let mut rng = StdRng::from_entropy();
            let notice = s.finish_suggestion(&ticket, outcome, &mut rng)?;
            Ok(SuggestionResponse {
                notice,
                session: s.view(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/keyword-sessions/:id/apply
///
/// Commits the draft, closes the session and returns the full updated text.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplyResponse>, AppError> {
    let resume_text = state.sessions.consume(id, |s| s.apply()).await?;
    info!(session_id = %id, "Applied keyword edit");
    Ok(Json(ApplyResponse { resume_text }))
}
