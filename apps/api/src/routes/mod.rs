pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::integration::handlers as keywords;
use crate::normalize::handlers as normalize;
use crate::parsing::handlers as parsing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes/normalize",
            post(normalize::handle_normalize),
        )
        .route("/api/v1/resumes/parse", post(parsing::handle_parse))
        .route("/api/v1/resumes/export", post(export::handle_export))
        // Keyword Integration API
        .route(
            "/api/v1/keywords/missing",
            post(keywords::handle_missing_keywords),
        )
        .route(
            "/api/v1/keyword-sessions",
            post(keywords::handle_open_session),
        )
        .route(
            "/api/v1/keyword-sessions/:id",
            get(keywords::handle_get_session).delete(keywords::handle_cancel_session),
        )
        .route(
            "/api/v1/keyword-sessions/:id/item",
            post(keywords::handle_select_item),
        )
        .route(
            "/api/v1/keyword-sessions/:id/action",
            post(keywords::handle_select_action),
        )
        .route(
            "/api/v1/keyword-sessions/:id/bullet",
            post(keywords::handle_select_bullet),
        )
        .route(
            "/api/v1/keyword-sessions/:id/draft",
            put(keywords::handle_set_draft),
        )
        .route(
            "/api/v1/keyword-sessions/:id/keywords",
            post(keywords::handle_toggle_keyword),
        )
        .route(
            "/api/v1/keyword-sessions/:id/back",
            post(keywords::handle_back),
        )
        .route(
            "/api/v1/keyword-sessions/:id/suggest",
            post(keywords::handle_suggest),
        )
        .route(
            "/api/v1/keyword-sessions/:id/apply",
            post(keywords::handle_apply),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::export::ExportSettings;
    use crate::integration::rewrite::{
        DisabledRewriter, RewriteError, RewriteRequest, RewriteResponse, RewriteService,
    };
    use crate::integration::store::SessionStore;

    const RESUME: &str = "EXPERIENCE\n\
        Acme Corp - Jan 2020 - Present\n\
        • Built the billing system\n\
        • Reduced deploy time by 30% with CI caching\n\
        \n\
        PROJECTS\n\
        Tailor - 2023\n\
        - Resume tailoring service in Rust\n";

    struct FixedRewriter;

    #[async_trait]
    impl RewriteService for FixedRewriter {
        async fn rewrite(&self, _req: &RewriteRequest) -> Result<RewriteResponse, RewriteError> {
            Ok(RewriteResponse {
                rewritten_bullet: "Ran billing workloads on Kubernetes".to_string(),
            })
        }
    }

    fn app(rewriter: Arc<dyn RewriteService>) -> Router {
        let config = Config {
            anthropic_api_key: None,
            rewrite_timeout: Duration::from_secs(1),
            pdf_font_path: None,
            max_body_bytes: 64 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        };
        build_router(AppState {
            config,
            rewriter,
            sessions: SessionStore::new(),
            export: ExportSettings::empty(),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(DisabledRewriter));
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["service"], "tailor-api");
        assert_eq!(body["rewrite"], "fallback");
    }

    #[tokio::test]
    async fn test_normalize_accepts_legacy_shape() {
        let app = app(Arc::new(DisabledRewriter));
        let raw = json!({
            "personalInfo": { "firstName": "Ada", "lastName": "Lovelace" },
            "skills": { "languages": ["Rust"] }
        });
        let response = send(&app, "POST", "/api/v1/resumes/normalize", Some(raw)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["personal"]["name"], "Ada Lovelace");
        assert_eq!(body["skills"][0]["items"][0], "Rust");
    }

    #[tokio::test]
    async fn test_parse_returns_items() {
        let app = app(Arc::new(DisabledRewriter));
        let response = send(
            &app,
            "POST",
            "/api/v1/resumes/parse",
            Some(json!({ "text": RESUME })),
        )
        .await;
        let body = json_body(response).await;
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "Acme Corp");
        assert_eq!(items[0]["bullets"].as_array().unwrap().len(), 2);
        let canonical = body["canonical"].as_str().unwrap();
        assert!(canonical.starts_with("EXPERIENCE\nAcme Corp–"));
    }

    #[tokio::test]
    async fn test_missing_keywords() {
        let app = app(Arc::new(DisabledRewriter));
        let response = send(
            &app,
            "POST",
            "/api/v1/keywords/missing",
            Some(json!({ "keywords": ["Rust", "Kubernetes"], "resume_text": RESUME })),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["keywords"], json!(["Kubernetes"]));
    }

    #[tokio::test]
    async fn test_export_text_is_attachment() {
        let app = app(Arc::new(DisabledRewriter));
        let request = json!({
            "resume": {
                "personal": { "name": "Ada Lovelace" },
                "experience": [{ "title": "Engineer", "company": "Acme" }]
            },
            "format": "txt",
            "filename": "ada"
        });
        let response = send(&app, "POST", "/api/v1/resumes/export", Some(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"ada.txt\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("Ada Lovelace\n"));
        assert!(text.contains("EXPERIENCE\n"));
        assert!(text.contains("Engineer\nAcme\n"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app(Arc::new(DisabledRewriter));
        let uri = format!("/api/v1/keyword-sessions/{}", uuid::Uuid::new_v4());
        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_new_bullet_flow_adds_one_line() {
        let app = app(Arc::new(FixedRewriter));
        let response = send(
            &app,
            "POST",
            "/api/v1/keyword-sessions",
            Some(json!({ "resume_text": RESUME, "keyword": "Kubernetes" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_str().unwrap().to_string();
        let base = format!("/api/v1/keyword-sessions/{id}");

        send(&app, "POST", &format!("{base}/item"), Some(json!({ "index": 0 }))).await;
        let response = send(
            &app,
            "POST",
            &format!("{base}/action"),
            Some(json!({ "action": "new" })),
        )
        .await;
        assert_eq!(json_body(response).await["step"], "compose");

        let response = send(&app, "POST", &format!("{base}/suggest"), None).await;
        let body = json_body(response).await;
        assert_eq!(body["notice"]["source"], "ai");
        assert_eq!(body["session"]["draft"], "Ran billing workloads on Kubernetes");
        assert_eq!(body["session"]["can_apply"], true);

        let response = send(&app, "POST", &format!("{base}/apply"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await["resume_text"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(updated.lines().count(), RESUME.lines().count() + 1);
        assert!(updated.contains("• Ran billing workloads on Kubernetes"));

        // applying closes the session
        let response = send(&app, "GET", &base, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_enhance_without_bullets_conflicts() {
        let app = app(Arc::new(DisabledRewriter));
        let text = "EXPERIENCE\nGlobex - 2018 - 2019\n";
        let response = send(
            &app,
            "POST",
            "/api/v1/keyword-sessions",
            Some(json!({ "resume_text": text, "keyword": "Go" })),
        )
        .await;
        let id = json_body(response).await["id"].as_str().unwrap().to_string();
        let base = format!("/api/v1/keyword-sessions/{id}");

        send(&app, "POST", &format!("{base}/item"), Some(json!({ "index": 0 }))).await;
        let response = send(
            &app,
            "POST",
            &format!("{base}/action"),
            Some(json!({ "action": "enhance" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            json_body(response).await["error"]["code"],
            "NO_BULLETS_TO_ENHANCE"
        );
    }

    #[tokio::test]
    async fn test_disabled_rewriter_falls_back_with_low_confidence() {
        let app = app(Arc::new(DisabledRewriter));
        let response = send(
            &app,
            "POST",
            "/api/v1/keyword-sessions",
            Some(json!({ "resume_text": RESUME, "keyword": "Kubernetes" })),
        )
        .await;
        let id = json_body(response).await["id"].as_str().unwrap().to_string();
        let base = format!("/api/v1/keyword-sessions/{id}");

        send(&app, "POST", &format!("{base}/item"), Some(json!({ "index": 0 }))).await;
        send(&app, "POST", &format!("{base}/action"), Some(json!({ "action": "enhance" }))).await;
        send(&app, "POST", &format!("{base}/bullet"), Some(json!({ "index": 0 }))).await;
        let body = json_body(send(&app, "POST", &format!("{base}/suggest"), None).await).await;

        assert_eq!(body["notice"]["source"], "fallback");
        assert_eq!(body["notice"]["confidence"], "low");
        assert_eq!(body["notice"]["cause"], "not_configured");
        assert!(body["session"]["draft"]
            .as_str()
            .unwrap()
            .contains("Kubernetes"));
    }
}
