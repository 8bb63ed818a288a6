//! JSON API over the analysis engine.

mod handlers;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::AnalysisEngine;
use crate::config::Config;
use crate::llm::BackendHandle;

pub use routes::create_router;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub engine: AnalysisEngine,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let backend = Arc::new(BackendHandle::new(config.llm.clone()));
        Self {
            engine: AnalysisEngine::new(backend),
        }
    }
}

/// Start the web server.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(config);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::llm::testing::ScriptedBackend;

    fn app_with(backend: Arc<ScriptedBackend>) -> axum::Router {
        create_router(AppState {
            engine: AnalysisEngine::new(backend),
        })
    }

    async fn post(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(ScriptedBackend::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "success");
    }

    #[tokio::test]
    async fn test_analyze_empty_text_is_error() {
        let backend = Arc::new(ScriptedBackend::new());
        let (status, json) = post(
            app_with(backend.clone()),
            "/api/analyze",
            json!({"text": "", "pages": []}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["status"], "error");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_contract() {
        let backend = Arc::new(ScriptedBackend::new().reply(
            r#"{"quick_preview": "- Cleaning services", "executive_summary": "A services deal.",
                "themes": ["Scope"], "key_insights": [], "categories": [], "follow_up_actions": []}"#,
        ));
        let (status, json) = post(
            app_with(backend.clone()),
            "/api/analyze",
            json!({"text": "Scope of Services: weekly cleaning.", "pages": ["Scope of Services: weekly cleaning."]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["label"], "contract");
        assert_eq!(json["doc_type"], "Legal Contract");
        assert_eq!(json["themes"], json!(["Scope"]));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_summarize_returns_planned_sections() {
        let backend = Arc::new(
            ScriptedBackend::new().reply(r#"{"sections": {"Risks": "Rates may rise."}}"#),
        );
        let (status, json) = post(
            app_with(backend),
            "/api/summarize",
            json!({
                "text": "Rates may rise next year.",
                "section_plan": ["Risks", "Outlook"],
                "format": "narrative",
                "depth": "quick"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sections"]["Risks"], "Rates may rise.");
        assert_eq!(json["sections"]["Outlook"], "Not discussed in the document.");
        assert_eq!(json["narrative"], "Rates may rise.");
    }

    #[tokio::test]
    async fn test_followup_records_source() {
        let backend = Arc::new(ScriptedBackend::new().reply(
            r#"{"answer": "Net 30.", "supporting_excerpts": ["within 30 days"]}"#,
        ));
        let (status, json) = post(
            app_with(backend),
            "/api/followup",
            json!({
                "document": {"text": "Invoices are payable within 30 days.", "pages": ["Invoices are payable within 30 days."]},
                "question": "Show payment terms and fees",
                "label_hint": "contract"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["answer"], "Net 30.");
        assert_eq!(json["source"], "followup");
        assert_eq!(json["supporting_excerpts"][0]["page"], 1);
    }

    #[tokio::test]
    async fn test_malformed_body_keeps_error_envelope() {
        let backend = Arc::new(ScriptedBackend::new());
        let response = app_with(backend.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"text\": "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json["message"].is_string());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_field_keeps_error_envelope() {
        let (status, json) = post(
            app_with(Arc::new(ScriptedBackend::new())),
            "/api/ask",
            json!({"question": "Who are the parties?"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_ask_empty_question_is_bad_request() {
        let (status, json) = post(
            app_with(Arc::new(ScriptedBackend::new())),
            "/api/ask",
            json!({"document": {"text": "Some text"}, "question": " "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
    }
}
