//! Pagewise - citation-backed document analysis.
//!
//! Turns extracted document text into a classification, themes, key
//! insights with page citations, categorized findings, follow-up prompts,
//! section-by-section summaries and sourced answers to questions.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod server;
pub mod summarize;
pub mod text;

pub use analysis::{AnalysisEngine, AnalysisError, AnalysisResult, Answer, CanonicalLabel};
pub use config::Config;
pub use summarize::{Depth, OutputFormat, SectionRequest, SectionSummary};
pub use text::Document;
