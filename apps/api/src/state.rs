use std::sync::Arc;

use crate::config::Config;
use crate::export::ExportSettings;
use crate::integration::rewrite::RewriteService;
use crate::integration::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable rewrite service. `LlmRewriter` when an API key is configured,
    /// `DisabledRewriter` otherwise.
    pub rewriter: Arc<dyn RewriteService>,
    /// The single open keyword-edit session, if any.
    pub sessions: SessionStore,
    /// Fonts for PDF rasterization, loaded once at startup.
    pub export: ExportSettings,
}
