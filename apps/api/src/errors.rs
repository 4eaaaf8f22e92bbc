use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::integration::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn session_status(err: &SessionError) -> (StatusCode, &'static str) {
    match err {
        SessionError::NotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
        SessionError::UnknownItem(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_ITEM"),
        SessionError::UnknownBullet(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_BULLET"),
        SessionError::EmptyKeyword => (StatusCode::BAD_REQUEST, "EMPTY_KEYWORD"),
        SessionError::WrongStep(_) => (StatusCode::CONFLICT, "WRONG_STEP"),
        SessionError::NoBulletsToEnhance => (StatusCode::CONFLICT, "NO_BULLETS_TO_ENHANCE"),
        SessionError::NoBulletSelected => (StatusCode::CONFLICT, "NO_BULLET_SELECTED"),
        SessionError::ApplyDisabled => (StatusCode::CONFLICT, "APPLY_DISABLED"),
        SessionError::SuggestionInFlight => (StatusCode::CONFLICT, "SUGGESTION_IN_FLIGHT"),
        SessionError::StaleSuggestion => (StatusCode::CONFLICT, "STALE_SUGGESTION"),
        SessionError::NoPreviousStep => (StatusCode::CONFLICT, "NO_PREVIOUS_STEP"),
        SessionError::LineOutOfRange(_) => (StatusCode::CONFLICT, "LINE_OUT_OF_RANGE"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Session(e) => {
                let (status, code) = session_status(e);
                (status, code, e.to_string())
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    "The resume could not be exported".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
