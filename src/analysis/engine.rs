//! Orchestration of the analysis operations.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::citation::match_citations;
use super::schema::{flatten_to_text, Fields};
use super::types::{AnalysisResult, Answer, CanonicalLabel, QuestionSource};
use super::{classifier, extractor, legacy, log_excerpt, prompts, AnalysisError, NO_CLEAR_ANSWER};
use crate::llm::{decode_object, GenerateOptions, GenerativeBackend};
use crate::summarize::{self, SectionRequest, SectionSummary};
use crate::text::Document;

/// Runs analyses against one generative backend.
///
/// Each call is an independent unit of work; nothing is cached between
/// requests.
#[derive(Clone)]
pub struct AnalysisEngine {
    backend: Arc<dyn GenerativeBackend>,
}

impl AnalysisEngine {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn GenerativeBackend {
        self.backend.as_ref()
    }

    pub async fn classify(&self, text: &str) -> CanonicalLabel {
        classifier::classify(text, self.backend()).await
    }

    /// Classify and extract, falling back to the multi-call pipeline when
    /// the single-call extraction fails.
    pub async fn analyze(&self, doc: &Document) -> Result<AnalysisResult, AnalysisError> {
        info!("Analyzing document: {} chars", doc.text.len());
        if doc.is_empty() {
            return Err(AnalysisError::ExtractionUnavailable);
        }

        let label = self.classify(&doc.text).await;

        match extractor::extract(doc, label, self.backend()).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Fast path failed, falling back to multi-call pipeline: {}", e);
                Ok(legacy::extract_legacy(doc, label, self.backend()).await)
            }
        }
    }

    /// Answer a question from the document text alone.
    ///
    /// Backend failures are returned; unparseable or empty answers resolve
    /// to [`NO_CLEAR_ANSWER`] without excerpts.
    pub async fn answer(
        &self,
        doc: &Document,
        question: &str,
        label_hint: Option<CanonicalLabel>,
        source: QuestionSource,
    ) -> Result<Answer, AnalysisError> {
        if question.trim().is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "question must not be empty".to_string(),
            ));
        }
        if doc.is_empty() {
            return Err(AnalysisError::ExtractionUnavailable);
        }

        let prompt = prompts::answer(&doc.text, question, label_hint);
        let raw = self
            .backend
            .generate(&prompt, &GenerateOptions::default())
            .await?;
        debug!("Answer response: {}", log_excerpt(&raw));

        let (answer, excerpts) = match decode_object(&raw) {
            Ok(map) => {
                let fields = Fields::new(&map);
                let answer = fields.text("answer");
                let excerpts: Vec<String> = fields
                    .list("supporting_excerpts")
                    .iter()
                    .map(flatten_to_text)
                    .filter(|s| !s.is_empty())
                    .collect();
                let answer = if answer.is_empty() {
                    NO_CLEAR_ANSWER.to_string()
                } else {
                    answer
                };
                (answer, excerpts)
            }
            Err(e) => {
                warn!("Could not decode answer: {}", e);
                (NO_CLEAR_ANSWER.to_string(), Vec::new())
            }
        };

        let supporting_excerpts = match_citations(&excerpts, &doc.pages);
        info!(
            "Answered {:?} question with {} citations",
            source,
            supporting_excerpts.len()
        );

        Ok(Answer {
            answer,
            supporting_excerpts,
            source,
        })
    }

    pub async fn summarize(
        &self,
        text: &str,
        request: &SectionRequest,
    ) -> Result<SectionSummary, AnalysisError> {
        summarize::summarize_sections(text, request, self.backend()).await
    }
}
