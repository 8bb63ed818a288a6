//! Multi-call fallback pipeline.
//!
//! Each sub-call is isolated: a failure degrades only its own field to a
//! fixed placeholder. Follow-up actions are rule-based and the pipeline
//! never produces categories.

use tracing::{debug, info, warn};

use super::extractor::{dedupe_actions, insights_from};
use super::prompts;
use super::schema::Fields;
use super::themes::{frequency_themes, normalize_themes, themes_from_response, tidy_themes, MAX_THEMES};
use super::types::{AnalysisPath, AnalysisResult, CanonicalLabel, Insight};
use super::{log_excerpt, AnalysisError};
use crate::llm::{decode_object, GenerateOptions, GenerativeBackend};
use crate::summarize::{enforce, OutputFormat};
use crate::text::Document;

pub const NO_PREVIEW: &str = "No summary returned by LLM.";
pub const PREVIEW_UNAVAILABLE: &str = "Quick preview unavailable due to internal error.";
pub const NO_EXECUTIVE_SUMMARY: &str = "No executive summary returned by LLM.";
pub const EXECUTIVE_SUMMARY_UNAVAILABLE: &str =
    "Executive summary unavailable due to internal error.";

const FINANCIAL_ACTIONS: &[&str] = &[
    "Show me all key risks",
    "Summarize financial performance",
    "Extract key metrics and ratios",
    "What guidance or outlook is discussed?",
];
const SENTIMENT_ACTION: &str = "Summarize management sentiment and tone";
const AGREEMENT_ACTIONS: &[&str] = &[
    "Summarize parties and obligations",
    "Show payment terms and fees",
    "Summarize termination and renewal conditions",
    "Highlight key risks and liabilities",
];
const GENERIC_ACTIONS: &[&str] = &[
    "Give me a more detailed summary",
    "Highlight the main risks or concerns",
    "Show any important numbers or metrics",
];

/// Rule-based follow-up actions for a label and its insights.
pub fn suggest_follow_ups(label: CanonicalLabel, insights: &[Insight]) -> Vec<String> {
    let mut actions: Vec<String> = Vec::new();

    if label.is_financial() {
        actions.extend(FINANCIAL_ACTIONS.iter().map(|a| a.to_string()));
        if label == CanonicalLabel::EarningsCall {
            actions.push(SENTIMENT_ACTION.to_string());
        }
    } else if label.is_agreement() {
        actions.extend(AGREEMENT_ACTIONS.iter().map(|a| a.to_string()));
    } else {
        actions.extend(GENERIC_ACTIONS.iter().map(|a| a.to_string()));
    }

    actions.extend(
        insights
            .iter()
            .take(2)
            .map(|i| i.title.trim())
            .filter(|t| !t.is_empty())
            .map(|t| format!("Show more detail about: {}", t)),
    );

    dedupe_actions(actions)
}

async fn quick_preview(text: &str, backend: &dyn GenerativeBackend) -> String {
    match backend
        .generate(&prompts::quick_preview(text), &GenerateOptions::default())
        .await
    {
        Ok(raw) if raw.trim().is_empty() => {
            warn!("Quick preview came back empty");
            NO_PREVIEW.to_string()
        }
        Ok(raw) => enforce(&raw, OutputFormat::Bullets),
        Err(e) => {
            warn!("Quick preview failed: {}", e);
            PREVIEW_UNAVAILABLE.to_string()
        }
    }
}

async fn executive_summary(
    text: &str,
    label: CanonicalLabel,
    backend: &dyn GenerativeBackend,
) -> String {
    match backend
        .generate(
            &prompts::executive_summary(text, label),
            &GenerateOptions::default(),
        )
        .await
    {
        Ok(raw) if raw.trim().is_empty() => {
            warn!("Executive summary came back empty");
            NO_EXECUTIVE_SUMMARY.to_string()
        }
        Ok(raw) => raw.trim().to_string(),
        Err(e) => {
            warn!("Executive summary failed: {}", e);
            EXECUTIVE_SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

async fn key_insights(
    doc: &Document,
    label: CanonicalLabel,
    backend: &dyn GenerativeBackend,
) -> Result<Vec<Insight>, AnalysisError> {
    let raw = backend
        .generate(
            &prompts::key_insights(&doc.text, label),
            &GenerateOptions::default(),
        )
        .await?;
    debug!("Key insights response: {}", log_excerpt(&raw));

    let map = decode_object(&raw)?;
    Ok(insights_from(Fields::new(&map).objects("insights"), &doc.pages))
}

async fn themes(text: &str, backend: &dyn GenerativeBackend) -> Vec<String> {
    match backend
        .generate(&prompts::themes(text), &GenerateOptions::default())
        .await
    {
        Ok(raw) => {
            debug!("Themes response: {}", log_excerpt(&raw));
            themes_from_response(&raw, text)
        }
        Err(e) => {
            warn!("Theme extraction failed, using word frequency: {}", e);
            tidy_themes(&frequency_themes(text, MAX_THEMES), MAX_THEMES)
        }
    }
}

/// Run the fallback pipeline. Never fails.
pub async fn extract_legacy(
    doc: &Document,
    label: CanonicalLabel,
    backend: &dyn GenerativeBackend,
) -> AnalysisResult {
    info!("Running multi-call fallback pipeline");

    let quick_preview = quick_preview(&doc.text, backend).await;
    let executive_summary = executive_summary(&doc.text, label, backend).await;

    let key_insights = match key_insights(doc, label, backend).await {
        Ok(insights) => insights,
        Err(e) => {
            warn!("Key insights failed: {}", e);
            Vec::new()
        }
    };

    let themes = normalize_themes(themes(&doc.text, backend).await);
    let follow_up_actions = suggest_follow_ups(label, &key_insights);

    info!(
        "Fallback path: {} themes, {} insights, {} follow-ups",
        themes.len(),
        key_insights.len(),
        follow_up_actions.len()
    );

    AnalysisResult {
        label,
        quick_preview,
        executive_summary,
        themes,
        key_insights,
        categories: Vec::new(),
        follow_up_actions,
        path: AnalysisPath::Legacy,
    }
}
