use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_REWRITE_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_EXPORT_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent key runs the keyword engine on the local fallback generator only.
    pub anthropic_api_key: Option<String>,
    pub rewrite_timeout: Duration,
    /// Extra font loaded for PDF rasterization, on top of system fonts.
    pub pdf_font_path: Option<PathBuf>,
    pub max_body_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            rewrite_timeout: Duration::from_secs(parse_env(
                "REWRITE_TIMEOUT_SECS",
                DEFAULT_REWRITE_TIMEOUT_SECS,
            )?),
            pdf_font_path: optional_env("PDF_FONT_PATH").map(PathBuf::from),
            max_body_bytes: parse_env("MAX_EXPORT_BODY_BYTES", DEFAULT_MAX_EXPORT_BODY_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Set and non-blank, or `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
