//! Structured section-by-section summaries.
//!
//! The caller supplies an ordered section plan; the result always holds
//! exactly one string per planned section, in plan order. Sections the
//! model skipped are filled with [`NOT_DISCUSSED`].

mod format;
mod templates;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

pub use format::{enforce, OutputFormat};
pub use templates::{template_for, SectionTemplate};

use crate::analysis::prompts::{truncate_chars, SECTIONS_BUDGET};
use crate::analysis::schema::{flatten_to_text, Fields};
use crate::analysis::{log_excerpt, AnalysisError, CanonicalLabel};
use crate::llm::{decode_object, GenerateOptions, GenerativeBackend};

/// Value for planned sections the document does not cover.
pub const NOT_DISCUSSED: &str = "Not discussed in the document.";

/// Synthetic section used when the response cannot be decoded.
pub const FALLBACK_SECTION: &str = "Summary";

const SECTIONS_UNAVAILABLE: &str = "Section summary unavailable due to internal error.";

/// How much to write per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Quick,
    #[default]
    Medium,
    Deep,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Quick => "quick",
            Depth::Medium => "medium",
            Depth::Deep => "deep",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Depth::Quick => "Write 2-4 sentences per section.",
            Depth::Medium => "Write 4-7 sentences per section.",
            Depth::Deep => "Write 2-3 short paragraphs per section.",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Depth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" => Ok(Depth::Quick),
            "medium" => Ok(Depth::Medium),
            "deep" => Ok(Depth::Deep),
            other => Err(format!("unknown depth '{}' (expected quick, medium or deep)", other)),
        }
    }
}

fn format_instruction(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Bullets => {
            "Each section value MUST be a single STRING.\n\
             Use '- ' for bullets inside the string.\n\
             DO NOT return arrays, JSON, or nested objects."
        }
        OutputFormat::Narrative => {
            "Each section value MUST be a single STRING.\n\
             Plain sentences only. NO bullets, NO JSON."
        }
    }
}

/// A summarize request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRequest {
    /// Ordered section topics; empty means "use the label's template".
    #[serde(default)]
    pub plan: Vec<String>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub depth: Depth,
    /// Picks the default template when `plan` is empty.
    #[serde(default)]
    pub label: Option<CanonicalLabel>,
}

/// Sections in plan order plus their rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub sections: IndexMap<String, String>,
    pub narrative: String,
}

/// Plan lines for the prompt, with template guidance when there is some.
fn plan_lines(request: &SectionRequest) -> (Vec<String>, String) {
    let planned: Vec<String> = request
        .plan
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if !planned.is_empty() {
        let readable = planned
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n");
        return (planned, readable);
    }

    let template = template_for(request.label.unwrap_or_default());
    let titles = template.iter().map(|s| s.title.to_string()).collect();
    let readable = template
        .iter()
        .map(|s| format!("- {}: {}", s.title, s.guidance))
        .collect::<Vec<_>>()
        .join("\n");
    (titles, readable)
}

fn sections_prompt(text: &str, readable_plan: &str, request: &SectionRequest) -> String {
    format!(
        r#"You are an EXTRACTIVE summarization model.

STRICT RULES:
- Use ONLY information in the document.
- NO speculation.
- If a section is not covered, write exactly "{not_discussed}"

SECTION PLAN (YOU MUST RETURN ALL OF THESE):
{plan}

IMPORTANT:
You MUST return an entry for EVERY section listed above, using the section
titles exactly as written.

FORMAT RULES:
{format}

DEPTH:
{depth}

OUTPUT (JSON ONLY):
{{
  "sections": {{
    "Section Title": "Text only",
    "Another Section": "Text only"
  }}
}}

DOCUMENT:
{document}
"#,
        not_discussed = NOT_DISCUSSED,
        plan = readable_plan,
        format = format_instruction(request.format),
        depth = request.depth.instruction(),
        document = truncate_chars(text, SECTIONS_BUDGET)
    )
}

/// Strip one stray wrapping brace or bracket from a section value.
fn clean_section_text(value: &str) -> String {
    let mut text = value.trim();
    if let Some(rest) = text.strip_prefix(['{', '[']) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(['}', ']']) {
        text = rest;
    }
    text.trim().to_string()
}

fn section_value(value: &Value) -> String {
    match value {
        Value::String(s) => clean_section_text(s),
        other => flatten_to_text(other),
    }
}

/// Align decoded sections with the plan.
///
/// Keys match exactly first, then case-insensitively after trimming.
/// Missing or blank sections become [`NOT_DISCUSSED`]; extras are dropped.
pub fn align_sections(plan: &[String], decoded: &Map<String, Value>) -> IndexMap<String, String> {
    let mut aligned = IndexMap::with_capacity(plan.len());

    for topic in plan {
        let found = decoded.get(topic).or_else(|| {
            let wanted = topic.trim().to_lowercase();
            decoded
                .iter()
                .find(|(key, _)| key.trim().to_lowercase() == wanted)
                .map(|(_, value)| value)
        });

        let text = found.map(section_value).unwrap_or_default();
        if text.is_empty() {
            warn!("Section '{}' missing from model output", topic);
            aligned.insert(topic.clone(), NOT_DISCUSSED.to_string());
        } else {
            aligned.insert(topic.clone(), text);
        }
    }

    let extras: Vec<&String> = decoded
        .keys()
        .filter(|key| {
            !plan
                .iter()
                .any(|t| t.trim().to_lowercase() == key.trim().to_lowercase())
        })
        .collect();
    if !extras.is_empty() {
        debug!("Ignoring unplanned sections: {:?}", extras);
    }

    aligned
}

fn is_not_discussed(content: &str) -> bool {
    content.to_lowercase().starts_with("not discussed")
}

fn with_overall_cue(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("Overall, {}{}", first.to_lowercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Collapse sections into one display string.
pub fn render(sections: &IndexMap<String, String>, format: OutputFormat) -> String {
    let mut combined: Vec<String> = Vec::new();

    for (title, content) in sections {
        let content = content.trim();
        if content.is_empty() || is_not_discussed(content) {
            continue;
        }

        match format {
            OutputFormat::Bullets => {
                combined.push(format!("{}:", title));
                combined.push(enforce(content, OutputFormat::Bullets));
            }
            OutputFormat::Narrative => {
                let title = title.to_lowercase();
                let text = if ["conclusion", "overall", "summary"]
                    .iter()
                    .any(|cue| title.contains(cue))
                {
                    with_overall_cue(content)
                } else {
                    content.to_string()
                };
                if !combined.contains(&text) {
                    combined.push(text);
                }
            }
        }
    }

    match format {
        OutputFormat::Bullets => combined.join("\n").trim().to_string(),
        OutputFormat::Narrative => combined
            .iter()
            .map(|s| format!("{}.", s.trim_end_matches('.')))
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string(),
    }
}

/// Summarize a document section by section.
pub async fn summarize_sections(
    text: &str,
    request: &SectionRequest,
    backend: &dyn GenerativeBackend,
) -> Result<SectionSummary, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::ExtractionUnavailable);
    }

    let (plan, readable_plan) = plan_lines(request);
    info!(
        "Summarizing {} sections ({}, {})",
        plan.len(),
        request.format,
        request.depth
    );

    let prompt = sections_prompt(text, &readable_plan, request);
    let sections = match backend.generate(&prompt, &GenerateOptions::default()).await {
        Ok(raw) => {
            debug!("Section summary response: {}", log_excerpt(&raw));
            match decode_object(&raw) {
                Ok(map) => {
                    let decoded = Fields::new(&map).object("sections").unwrap_or(&map);
                    align_sections(&plan, decoded)
                }
                Err(e) => {
                    warn!("Section summary was not valid JSON: {}", e);
                    IndexMap::from([(FALLBACK_SECTION.to_string(), raw.trim().to_string())])
                }
            }
        }
        Err(e) => {
            warn!("Section summary call failed: {}", e);
            IndexMap::from([(
                FALLBACK_SECTION.to_string(),
                SECTIONS_UNAVAILABLE.to_string(),
            )])
        }
    };

    let narrative = render(&sections, request.format);
    Ok(SectionSummary {
        sections,
        narrative,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::llm::testing::ScriptedBackend;

    fn plan(topics: &[&str]) -> Vec<String> {
        topics.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_align_exact_then_case_insensitive() {
        let decoded = json!({
            " risks ": "Credit risk is rising.",
            "Outlook": ["Growth", "Hiring"],
            "Extra": "ignored"
        });
        let map = decoded.as_object().unwrap();
        let aligned = align_sections(&plan(&["Risks", "Outlook", "Litigation"]), map);

        let keys: Vec<_> = aligned.keys().cloned().collect();
        assert_eq!(keys, vec!["Risks", "Outlook", "Litigation"]);
        assert_eq!(aligned["Risks"], "Credit risk is rising.");
        assert_eq!(aligned["Outlook"], "- Growth\n- Hiring");
        assert_eq!(aligned["Litigation"], NOT_DISCUSSED);
    }

    #[test]
    fn test_clean_section_text() {
        assert_eq!(clean_section_text("{Revenue up}"), "Revenue up");
        assert_eq!(clean_section_text("[a, b]"), "a, b");
        assert_eq!(clean_section_text("{{nested}}"), "{nested}");
        assert_eq!(clean_section_text("  plain "), "plain");
    }

    #[test]
    fn test_render_bullets_skips_not_discussed() {
        let mut sections = IndexMap::new();
        sections.insert("Risks".to_string(), "Credit risk\nFX risk".to_string());
        sections.insert("Outlook".to_string(), NOT_DISCUSSED.to_string());
        assert_eq!(
            render(&sections, OutputFormat::Bullets),
            "Risks:\n- Credit risk\n- FX risk"
        );
    }

    #[test]
    fn test_render_narrative_cue_and_dedupe() {
        let mut sections = IndexMap::new();
        sections.insert("Performance".to_string(), "Revenue grew.".to_string());
        sections.insert("Repeat".to_string(), "Revenue grew.".to_string());
        sections.insert("Conclusion".to_string(), "The year was strong".to_string());
        sections.insert("Gaps".to_string(), "not discussed here".to_string());
        assert_eq!(
            render(&sections, OutputFormat::Narrative),
            "Revenue grew. Overall, the year was strong."
        );
    }

    #[tokio::test]
    async fn test_plan_keys_always_present() {
        let backend = ScriptedBackend::new()
            .reply(r#"```json
{"sections": {"Risks": "Liquidity is tight.", "Summary": "extra"}}
```"#);
        let request = SectionRequest {
            plan: plan(&["Risks", "Outlook"]),
            ..Default::default()
        };
        let summary = summarize_sections("Some text", &request, &backend)
            .await
            .unwrap();

        let keys: Vec<_> = summary.sections.keys().cloned().collect();
        assert_eq!(keys, vec!["Risks", "Outlook"]);
        assert_eq!(summary.sections["Outlook"], NOT_DISCUSSED);
        assert_eq!(summary.narrative, "Risks:\n- Liquidity is tight.");
    }

    #[tokio::test]
    async fn test_empty_plan_uses_template_with_guidance() {
        let backend = ScriptedBackend::new().reply("{}");
        let request = SectionRequest {
            label: Some(CanonicalLabel::Contract),
            ..Default::default()
        };
        let summary = summarize_sections("Some text", &request, &backend)
            .await
            .unwrap();

        assert_eq!(summary.sections.len(), 5);
        assert!(summary.sections.values().all(|v| v == NOT_DISCUSSED));
        assert!(backend.prompts()[0].contains("- Key Obligations: Summarize obligations of each party."));
        assert_eq!(summary.narrative, "");
    }

    #[tokio::test]
    async fn test_unparseable_response_becomes_summary_section() {
        let backend = ScriptedBackend::new().reply("The model rambled instead.");
        let request = SectionRequest {
            plan: plan(&["Risks"]),
            format: OutputFormat::Narrative,
            ..Default::default()
        };
        let summary = summarize_sections("Some text", &request, &backend)
            .await
            .unwrap();
        assert_eq!(summary.sections.len(), 1);
        assert_eq!(summary.sections[FALLBACK_SECTION], "The model rambled instead.");
        assert_eq!(summary.narrative, "Overall, the model rambled instead.");
    }

    #[tokio::test]
    async fn test_empty_text_is_error_without_calls() {
        let backend = ScriptedBackend::new();
        let err = summarize_sections("  ", &SectionRequest::default(), &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractionUnavailable));
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn test_parse_depth() {
        assert_eq!("DEEP".parse::<Depth>(), Ok(Depth::Deep));
        assert!("long".parse::<Depth>().is_err());
    }
}
