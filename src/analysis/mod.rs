//! Document analysis: classification, structured extraction with a
//! multi-call fallback, citation matching and question answering.

pub mod citation;
pub mod classifier;
mod engine;
pub mod extractor;
pub mod legacy;
pub mod prompts;
pub mod schema;
pub mod themes;
mod types;

use thiserror::Error;

use crate::llm::{DecodeError, LlmError};

pub use engine::AnalysisEngine;
pub use types::{
    AnalysisPath, AnalysisResult, Answer, CanonicalLabel, Category, Citation, Insight,
    QuestionSource, Snippet,
};

/// Answer used when the document does not support a claim.
pub const NO_CLEAR_ANSWER: &str = "The document does not provide a clear answer.";

/// Longest model response echoed into debug logs.
const LOG_EXCERPT_CHARS: usize = 2_000;

/// Errors surfaced by analysis operations.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The text provider produced nothing to analyze.
    #[error("No text could be extracted from the document")]
    ExtractionUnavailable,

    #[error("Generative backend error: {0}")]
    Backend(#[from] LlmError),

    #[error("Could not decode model output: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub(crate) fn log_excerpt(raw: &str) -> &str {
    prompts::truncate_chars(raw.trim(), LOG_EXCERPT_CHARS)
}
