//! HTTP request handlers for the web server.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::AppState;
use crate::analysis::{AnalysisError, AnalysisResult, Answer, CanonicalLabel, QuestionSource};
use crate::summarize::{Depth, OutputFormat, SectionRequest, SectionSummary};
use crate::text::Document;

/// Successful response body: `{"status": "success", ...payload}`.
#[derive(Serialize)]
struct Success<T: Serialize> {
    status: &'static str,
    #[serde(flatten)]
    payload: T,
}

fn success<T: Serialize>(payload: T) -> Response {
    Json(Success {
        status: "success",
        payload,
    })
    .into_response()
}

fn error_body(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "status": "error",
            "message": message,
        })),
    )
        .into_response()
}

fn error_response(err: AnalysisError) -> Response {
    let status = match &err {
        AnalysisError::ExtractionUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        AnalysisError::Backend(_) | AnalysisError::Decode(_) => StatusCode::BAD_GATEWAY,
    };
    warn!("Request failed: {}", err);
    error_body(status, err.to_string())
}

/// Malformed or mistyped request bodies keep the error envelope.
fn rejection_response(rejection: JsonRejection) -> Response {
    warn!("Rejected request body: {}", rejection.body_text());
    error_body(rejection.status(), rejection.body_text())
}

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "success",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Serialize)]
struct AnalyzeResponse {
    doc_type: &'static str,
    #[serde(flatten)]
    result: AnalysisResult,
}

/// Analyze a document's text.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Response {
    let Json(doc) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match state.engine.analyze(&doc).await {
        Ok(result) => success(AnalyzeResponse {
            doc_type: result.doc_type(),
            result,
        }),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SummarizeBody {
    text: String,
    #[serde(default, alias = "priorities")]
    section_plan: Vec<String>,
    #[serde(default)]
    format: OutputFormat,
    #[serde(default)]
    depth: Depth,
    #[serde(default)]
    doc_type: Option<String>,
}

/// Section-by-section summary.
pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeBody>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    let request = SectionRequest {
        plan: body.section_plan,
        format: body.format,
        depth: body.depth,
        label: body.doc_type.as_deref().map(CanonicalLabel::parse),
    };
    match state.engine.summarize(&body.text, &request).await {
        Ok(summary) => success::<SectionSummary>(summary),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionBody {
    document: Document,
    question: String,
    #[serde(default)]
    label_hint: Option<String>,
}

async fn answer(
    state: AppState,
    payload: Result<Json<QuestionBody>, JsonRejection>,
    source: QuestionSource,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    let label = body.label_hint.as_deref().map(CanonicalLabel::parse);
    match state
        .engine
        .answer(&body.document, &body.question, label, source)
        .await
    {
        Ok(answer) => success::<Answer>(answer),
        Err(e) => error_response(e),
    }
}

/// Free-form question.
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<QuestionBody>, JsonRejection>,
) -> Response {
    answer(state, payload, QuestionSource::Ask).await
}

/// Suggested follow-up action, answered like a question.
pub async fn followup(
    State(state): State<AppState>,
    payload: Result<Json<QuestionBody>, JsonRejection>,
) -> Response {
    answer(state, payload, QuestionSource::Followup).await
}
