//! Multi-format exporter: PDF, DOCX and plain text from one canonical resume.
//!
//! Every format renders the same block stream (`sections::build_blocks`) derived from
//! `formatted::format_resume_data`, so section order and content agree across formats.

pub mod docx;
pub mod formatted;
pub mod handlers;
pub mod metrics;
pub mod pdf;
pub mod preview;
pub mod sections;
pub mod text;

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use usvg::fontdb;

use crate::models::resume::CanonicalResume;

pub const DEFAULT_FILENAME: &str = "resume";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    #[serde(alias = "word")]
    Docx,
    #[serde(alias = "txt")]
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("DOCX generation failed: {0}")]
    Docx(String),

    #[error("Font could not be loaded: {0}")]
    Font(String),

    #[error("Export task failed: {0}")]
    Task(String),
}

/// Font database shared by every PDF export. Loaded once at startup.
#[derive(Clone)]
pub struct ExportSettings {
    pub fonts: Arc<fontdb::Database>,
}

impl ExportSettings {
    /// System fonts plus an optional extra font file.
    pub fn load(extra_font: Option<&Path>) -> Result<Self, ExportError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(path) = extra_font {
            db.load_font_file(path)
                .map_err(|e| ExportError::Font(format!("{}: {e}", path.display())))?;
        }
        info!(faces = db.len(), "Loaded export fonts");
        Ok(Self {
            fonts: Arc::new(db),
        })
    }

    /// No fonts at all; PDF rasters come out without text.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            fonts: Arc::new(fontdb::Database::new()),
        }
    }
}

/// Strips path separators and control characters; falls back to `resume`.
pub fn sanitize_filename(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|'))
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').to_string();
    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// Renders `resume` in `format`. Nothing partial is returned on failure.
pub async fn export(
    resume: &CanonicalResume,
    format: ExportFormat,
    filename: &str,
    settings: &ExportSettings,
) -> Result<ExportArtifact, ExportError> {
    let model = formatted::format_resume_data(resume);
    let blocks = sections::build_blocks(&model);
    let stem = sanitize_filename(filename);
    debug!(?format, blocks = blocks.len(), "Exporting resume");

    let bytes = match format {
        ExportFormat::Text => text::render_text(&blocks).into_bytes(),
        ExportFormat::Docx => docx::write_docx(&docx::build_document(&blocks))?,
        ExportFormat::Pdf => {
            let fonts = settings.fonts.clone();
            let title = stem.clone();
            tokio::task::spawn_blocking(move || {
                let preview = preview::render_preview(&blocks);
                pdf::render_pdf(&preview, fonts, &title)
            })
                .await
                .map_err(|e| ExportError::Task(e.to_string()))??
        }
    };

    Ok(ExportArtifact {
        filename: format!("{stem}.{}", format.extension()),
        mime: format.mime(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, PersonalInfo};
    use std::io::{Cursor, Read};

    fn resume() -> CanonicalResume {
        CanonicalResume {
            personal: PersonalInfo {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                ..Default::default()
            },
            experience: vec![
                ExperienceEntry {
                    title: "Staff Engineer".to_string(),
                    organization: "Acme".to_string(),
                    start_date: "2021-02".to_string(),
                    bullets: vec!["Cut p99 latency by 40%".to_string()],
                    ..Default::default()
                },
                ExperienceEntry {
                    title: "Software Engineer".to_string(),
                    organization: "Initech".to_string(),
                    start_date: "2018-01".to_string(),
                    end_date: "2021-01".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn docx_document(bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_format_deserializes_aliases() {
        let parse = |s: &str| serde_json::from_value::<ExportFormat>(serde_json::json!(s)).unwrap();
        assert_eq!(parse("pdf"), ExportFormat::Pdf);
        assert_eq!(parse("word"), ExportFormat::Docx);
        assert_eq!(parse("docx"), ExportFormat::Docx);
        assert_eq!(parse("txt"), ExportFormat::Text);
        assert_eq!(parse("text"), ExportFormat::Text);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My Resume"), "My Resume");
        assert_eq!(sanitize_filename("../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("  "), "resume");
    }

    #[tokio::test]
    async fn test_text_artifact_metadata() {
        let artifact = export(&resume(), ExportFormat::Text, "ada", &ExportSettings::empty())
            .await
            .unwrap();
        assert_eq!(artifact.filename, "ada.txt");
        assert_eq!(artifact.mime, "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn test_experience_titles_agree_across_formats() {
        let settings = ExportSettings::empty();
        let resume = resume();

        let text = export(&resume, ExportFormat::Text, "r", &settings).await.unwrap();
        let text = String::from_utf8(text.bytes).unwrap();
        let docx = export(&resume, ExportFormat::Docx, "r", &settings).await.unwrap();
        let document = docx_document(&docx.bytes);
        let svg = preview::render_preview(&sections::build_blocks(
            &formatted::format_resume_data(&resume),
        ))
        .svg;

        for entry in &resume.experience {
            assert!(text.contains(&entry.title), "text missing {}", entry.title);
            assert!(document.contains(&entry.title), "docx missing {}", entry.title);
            assert!(svg.contains(&entry.title), "pdf preview missing {}", entry.title);
        }
        // same order everywhere
        let order = |hay: &str| hay.find("Staff Engineer").unwrap() < hay.find("Software Engineer").unwrap();
        assert!(order(&text) && order(&document) && order(&svg));
    }

    #[tokio::test]
    async fn test_oversized_pdf_is_rejected() {
        let mut resume = resume();
        resume.experience[0].bullets = (0..4000)
            .map(|i| format!("Delivered initiative number {i}"))
            .collect();
        let err = export(&resume, ExportFormat::Pdf, "ada", &ExportSettings::empty())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_pdf_artifact_is_pdf() {
        let artifact = export(&resume(), ExportFormat::Pdf, "ada", &ExportSettings::empty())
            .await
            .unwrap();
        assert_eq!(artifact.filename, "ada.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }
}
