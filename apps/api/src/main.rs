mod config;
mod errors;
mod export;
mod integration;
mod llm_client;
mod models;
mod normalize;
mod parsing;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::ExportSettings;
use crate::integration::rewrite::{DisabledRewriter, LlmRewriter, RewriteService};
use crate::integration::store::SessionStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Rewrite backend: LLM when a key is configured, local fallback only otherwise
    let rewriter: Arc<dyn RewriteService> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.rewrite_timeout)?;
            info!(
                "Rewrite service: LLM (model: {}, budget: {:?})",
                llm_client::MODEL,
                config.rewrite_timeout
            );
            Arc::new(LlmRewriter::new(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; keyword suggestions use the local fallback only");
            Arc::new(DisabledRewriter)
        }
    };

    // Fonts for PDF export
    let export = tokio::task::spawn_blocking({
        let font_path = config.pdf_font_path.clone();
        move || ExportSettings::load(font_path.as_deref())
    })
    .await??;

    let state = AppState {
        config: config.clone(),
        rewriter,
        sessions: SessionStore::new(),
        export,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
