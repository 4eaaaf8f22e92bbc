//! Axum route handler for the Export API.

use std::fmt::Write;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::export::{export, ExportFormat, DEFAULT_FILENAME};
use crate::normalize::normalize;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// Any resume-shaped JSON; normalized before rendering.
    pub resume: Value,
    pub format: ExportFormat,
    #[serde(default)]
    pub filename: Option<String>,
}

/// `attachment; filename="..."` with an RFC 5987 `filename*` for non-ASCII names.
fn content_disposition(filename: &str) -> HeaderValue {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();
    let mut value = format!("attachment; filename=\"{ascii}\"");
    if !filename.is_ascii() {
        value.push_str("; filename*=UTF-8''");
        for byte in filename.bytes() {
            if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
                value.push(byte as char);
            } else {
                let _ = write!(value, "%{byte:02X}");
            }
        }
    }
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// POST /api/v1/resumes/export
///
/// Normalizes the posted resume and returns the rendered file as an attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let resume = normalize(&request.resume);
    let filename = request.filename.as_deref().unwrap_or(DEFAULT_FILENAME);
    let artifact = export(&resume, request.format, filename, &state.export).await?;

    info!(
        format = ?request.format,
        filename = %artifact.filename,
        bytes = artifact.bytes.len(),
        "Exported resume"
    );

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(artifact.mime)),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&artifact.filename),
        ),
    ];
    Ok((headers, artifact.bytes).into_response())
}
