//! Single-call structured analysis (the fast path).
//!
//! One prompt asks for every field at once. Any backend or decode failure is
//! returned to the caller, who decides whether to fall back; this module
//! never degrades on its own.

use std::collections::HashSet;

use tracing::{debug, info};

use super::citation::find_page;
use super::prompts;
use super::schema::Fields;
use super::themes::normalize_themes;
use super::types::{AnalysisPath, AnalysisResult, CanonicalLabel, Category, Insight, Snippet};
use super::{log_excerpt, AnalysisError};
use crate::llm::{decode_object, GenerateOptions, GenerativeBackend};
use crate::text::Document;

pub const MAX_INSIGHTS: usize = 6;
pub const MAX_FOLLOW_UPS: usize = 6;

const NO_SUMMARY: &str = "No summary available.";

/// Build insights from decoded objects.
///
/// Objects with no title, summary or excerpt are dropped; the summary falls
/// back to the excerpt and then to a fixed sentinel.
pub fn insights_from<'a>(
    items: impl Iterator<Item = Fields<'a>>,
    pages: &[String],
) -> Vec<Insight> {
    items
        .filter_map(|item| {
            let title = item.text("title");
            let summary = item.text("summary");
            let excerpt = item.text("source_excerpt");
            if title.is_empty() && summary.is_empty() && excerpt.is_empty() {
                return None;
            }

            let summary = if !summary.is_empty() {
                summary
            } else if !excerpt.is_empty() {
                excerpt.clone()
            } else {
                NO_SUMMARY.to_string()
            };

            Some(Insight {
                title: if title.is_empty() {
                    "Insight".to_string()
                } else {
                    title
                },
                summary,
                page: find_page(&excerpt, pages),
                source_excerpt: excerpt,
            })
        })
        .take(MAX_INSIGHTS)
        .collect()
}

/// Lowercase slug of word characters joined by underscores.
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn categories_from<'a>(
    items: impl Iterator<Item = Fields<'a>>,
    pages: &[String],
) -> Vec<Category> {
    items
        .filter_map(|item| {
            let key = slugify(&item.text("key"));
            let title = item.text("title");
            let summary = item.text("summary");
            let snippet_texts = item.string_list("snippet_texts");
            if key.is_empty() && title.is_empty() && summary.is_empty() && snippet_texts.is_empty()
            {
                return None;
            }

            let key = if !key.is_empty() {
                key
            } else {
                Some(slugify(&title))
                    .filter(|slug| !slug.is_empty())
                    .unwrap_or_else(|| "category".to_string())
            };

            let snippets = snippet_texts
                .into_iter()
                .map(|text| Snippet {
                    page: find_page(&text, pages),
                    text,
                })
                .collect();

            Some(Category {
                key,
                title: if title.is_empty() {
                    "Category".to_string()
                } else {
                    title
                },
                summary,
                snippets,
            })
        })
        .collect()
}

/// Trim, dedupe (order-preserving) and cap follow-up actions.
pub fn dedupe_actions<I>(actions: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    actions
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty() && seen.insert(a.clone()))
        .take(MAX_FOLLOW_UPS)
        .collect()
}

/// Turn a raw fast-path response into a result.
pub fn parse_full_analysis(
    raw: &str,
    label: CanonicalLabel,
    pages: &[String],
) -> Result<AnalysisResult, AnalysisError> {
    let map = decode_object(raw)?;
    let fields = Fields::new(&map);

    let key_insights = insights_from(fields.objects("key_insights"), pages);
    let categories = categories_from(fields.objects("categories"), pages);
    let follow_up_actions = dedupe_actions(fields.string_list("follow_up_actions"));

    Ok(AnalysisResult {
        label,
        quick_preview: fields.text("quick_preview"),
        executive_summary: fields.text("executive_summary"),
        themes: normalize_themes(fields.string_list("themes")),
        key_insights,
        categories,
        follow_up_actions,
        path: AnalysisPath::Fast,
    })
}

/// Run the fast path. Errors propagate unchanged.
pub async fn extract(
    doc: &Document,
    label: CanonicalLabel,
    backend: &dyn GenerativeBackend,
) -> Result<AnalysisResult, AnalysisError> {
    let prompt = prompts::full_analysis(&doc.text, label);
    let raw = backend.generate(&prompt, &GenerateOptions::default()).await?;
    debug!("Full analysis response: {}", log_excerpt(&raw));

    let result = parse_full_analysis(&raw, label, &doc.pages)?;
    info!(
        "Fast path: {} themes, {} insights, {} categories, {} follow-ups",
        result.themes.len(),
        result.key_insights.len(),
        result.categories.len(),
        result.follow_up_actions.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedBackend;
    use crate::analysis::themes::NO_THEMES_SENTINEL;

    fn pages() -> Vec<String> {
        vec![
            "Revenue grew 12% year over year.".to_string(),
            "The board approved a dividend of $0.40 per share.".to_string(),
        ]
    }

    const RESPONSE: &str = r#"Here you go:
```json
{
  "quick_preview": " - Revenue up\n- Dividend approved ",
  "executive_summary": "Strong year.",
  "themes": ["Growth", "  ", "Capital Returns"],
  "key_insights": [
    {"title": "Revenue growth", "summary": "", "source_excerpt": "Revenue grew 12%"},
    {"title": "", "summary": "", "source_excerpt": ""},
    "not an object",
    {"summary": "Dividend declared", "source_excerpt": "dividend of $0.40 per share"}
  ],
  "categories": [
    {"key": "Capital Returns!", "title": "Capital Returns", "summary": "Dividend.", "snippet_texts": ["dividend of $0.40", 5]},
    {"title": "Growth Drivers", "summary": "Revenue."},
    {}
  ],
  "follow_up_actions": ["Show me all key risks", "Show me all key risks", " Summarize financial performance "]
}
```"#;

    #[test]
    fn test_parse_full_analysis_normalizes() {
        let result = parse_full_analysis(RESPONSE, CanonicalLabel::AnnualReport, &pages()).unwrap();

        assert_eq!(result.path, AnalysisPath::Fast);
        assert_eq!(result.quick_preview, "- Revenue up\n- Dividend approved");
        assert_eq!(result.themes, vec!["Growth", "Capital Returns"]);

        assert_eq!(result.key_insights.len(), 2);
        assert_eq!(result.key_insights[0].summary, "Revenue grew 12%");
        assert_eq!(result.key_insights[0].page, Some(1));
        assert_eq!(result.key_insights[1].title, "Insight");
        assert_eq!(result.key_insights[1].page, Some(2));

        assert_eq!(result.categories.len(), 2);
        assert_eq!(result.categories[0].key, "capital_returns");
        assert_eq!(result.categories[0].snippets.len(), 1);
        assert_eq!(result.categories[0].snippets[0].page, Some(2));
        assert_eq!(result.categories[1].key, "growth_drivers");
        assert!(result.categories[1].snippets.is_empty());

        assert_eq!(
            result.follow_up_actions,
            vec!["Show me all key risks", "Summarize financial performance"]
        );
    }

    #[test]
    fn test_wrong_shapes_default() {
        let raw = r#"{"quick_preview": 3, "themes": "nope", "key_insights": {"a": 1}}"#;
        let result = parse_full_analysis(raw, CanonicalLabel::General, &[]).unwrap();
        assert_eq!(result.quick_preview, "");
        assert_eq!(result.themes, vec![NO_THEMES_SENTINEL]);
        assert!(result.key_insights.is_empty());
        assert!(result.categories.is_empty());

        let result = parse_full_analysis("{}", CanonicalLabel::General, &[]).unwrap();
        assert_eq!(result.themes, vec![NO_THEMES_SENTINEL]);
    }

    #[test]
    fn test_string_themes_are_not_split() {
        let raw = r#"{"themes": "Growth\nMargins"}"#;
        let result = parse_full_analysis(raw, CanonicalLabel::General, &[]).unwrap();
        assert_eq!(result.themes, vec![NO_THEMES_SENTINEL]);
    }

    #[test]
    fn test_summary_sentinel_when_only_title() {
        let raw = r#"{"key_insights": [{"title": "Lonely"}]}"#;
        let result = parse_full_analysis(raw, CanonicalLabel::General, &[]).unwrap();
        assert_eq!(result.key_insights[0].summary, "No summary available.");
        assert_eq!(result.key_insights[0].page, None);
    }

    #[test]
    fn test_insights_capped() {
        let items: Vec<String> = (0..9)
            .map(|i| format!(r#"{{"title": "T{}"}}"#, i))
            .collect();
        let raw = format!(r#"{{"key_insights": [{}]}}"#, items.join(","));
        let result = parse_full_analysis(&raw, CanonicalLabel::General, &[]).unwrap();
        assert_eq!(result.key_insights.len(), MAX_INSIGHTS);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Growth Drivers"), "growth_drivers");
        assert_eq!(slugify("  risk-factors (2024) "), "risk_factors_2024");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_unparseable_response_is_error() {
        let err = parse_full_analysis("no json here", CanonicalLabel::General, &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let backend = ScriptedBackend::new().fail();
        let doc = Document::from_pages(pages());
        let err = extract(&doc, CanonicalLabel::General, &backend)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Backend(_)));
        assert_eq!(backend.calls(), 1);
    }
}
