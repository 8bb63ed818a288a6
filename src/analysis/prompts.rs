//! Prompt templates.
//!
//! Every prompt embeds a bounded prefix of the document; the budgets below
//! are character counts and truncation is char-boundary safe.

use super::types::CanonicalLabel;

pub const CLASSIFIER_BUDGET: usize = 3_000;
pub const FULL_ANALYSIS_BUDGET: usize = 16_000;
pub const EXECUTIVE_SUMMARY_BUDGET: usize = 16_000;
pub const INSIGHTS_BUDGET: usize = 16_000;
pub const QUICK_PREVIEW_BUDGET: usize = 14_000;
pub const THEMES_BUDGET: usize = 14_000;
pub const QA_BUDGET: usize = 16_000;
pub const SECTIONS_BUDGET: usize = 24_000;

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn document_block(text: &str, budget: usize) -> String {
    format!(
        "-----------------------------------------\n\
         DOCUMENT (BEGIN)\n\
         -----------------------------------------\n\
         {}\n\
         -----------------------------------------\n\
         DOCUMENT (END)\n\
         -----------------------------------------",
        truncate_chars(text, budget)
    )
}

fn type_hint(label: Option<CanonicalLabel>) -> &'static str {
    label.map(|l| l.as_str()).unwrap_or("document")
}

/// Constrain the model to a single canonical label.
pub fn classify(text: &str) -> String {
    let labels = CanonicalLabel::ALL
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are a document classifier.

Classify the document into EXACTLY ONE of these labels:
{labels}

Rules:
- ONLY answer with the label.
- No sentences. No explanation. Just the label.

Document Text:
{text}"#,
        labels = labels,
        text = truncate_chars(text, CLASSIFIER_BUDGET)
    )
}

/// Single-shot structured analysis returning all six fields.
pub fn full_analysis(text: &str, label: CanonicalLabel) -> String {
    format!(
        r#"You are an assistant helping a professional user (banker / analyst / investor)
understand a single {hint} document quickly.

You must return a SINGLE JSON object capturing ALL of these fields:

{{
  "quick_preview": "4-6 bullet points, as a single string (you may format with '- ' bullets)",
  "executive_summary": "3-6 short paragraphs of narrative text (plain text, no bullets)",
  "themes": ["Short theme name 1", "Short theme name 2", "Short theme name 3"],
  "key_insights": [
    {{
      "title": "2-7 word title",
      "summary": "1-3 sentence extractive summary based ONLY on the document.",
      "source_excerpt": "Short verbatim quote from the document that supports this insight."
    }}
  ],
  "categories": [
    {{
      "key": "growth_drivers",
      "title": "Growth Drivers",
      "summary": "2-5 sentence summary of this aspect.",
      "snippet_texts": ["Short verbatim snippet from the document relevant to this category"]
    }}
  ],
  "follow_up_actions": ["User-friendly suggested follow-up question"]
}}

STRICT RULES:
- Use ONLY the provided document text. No external facts.
- Be conservative: if something is unclear, say less rather than hallucinate.
- Themes must be short (2-5 words).
- key_insights[*].source_excerpt and categories[*].snippet_texts[*]
  MUST be copied verbatim from the document (you may trim for brevity).
- Make follow_up_actions concrete, like "Show me all key risks" or
  "What guidance or outlook is discussed?".

Return ONLY valid JSON. No markdown, no commentary.

{document}
"#,
        hint = label.as_str(),
        document = document_block(text, FULL_ANALYSIS_BUDGET)
    )
}

/// Extractive bullet preview used by the fallback pipeline.
pub fn quick_preview(text: &str) -> String {
    format!(
        r#"You are an EXTRACTIVE summarization model.

Summarize ONLY the text provided.
STRICT RULES:
- DO NOT guess or invent information.
- DO NOT add data that is not explicitly present in the text.
- DO NOT generalize beyond the document.

Write the summary strictly as bullet points.
- Use '-' for bullets
- No paragraphs
- No section headers

Return ONLY the 4-6 most essential points.

{document}

Now return the final summary.
"#,
        document = document_block(text, QUICK_PREVIEW_BUDGET)
    )
}

pub fn executive_summary(text: &str, label: CanonicalLabel) -> String {
    format!(
        r#"You are generating an EXECUTIVE SUMMARY for a professional user
(e.g. banker, analyst, or investor) who has just uploaded a {hint}.

STRICT RULES:
- Be factual and extractive. Use ONLY information in the text.
- Do NOT speculate or add external knowledge.
- Aim for 3-6 short paragraphs.
- Emphasize decision-relevant points (financial position, key risks,
  outlook, obligations, material events) as fits the document type.

Output a single narrative block of plain text. No bullet points.

{document}
"#,
        hint = label.as_str(),
        document = document_block(text, EXECUTIVE_SUMMARY_BUDGET)
    )
}

pub fn key_insights(text: &str, label: CanonicalLabel) -> String {
    format!(
        r#"You are an assistant generating KEY INSIGHTS for a professional user
who has uploaded a {hint}.

TASK:
- Identify the 3-6 most important insights or findings in this document.
- For each insight provide a short title (2-7 words), a 1-3 sentence
  extractive summary, and a short source_excerpt copied verbatim from
  the document.

STRICT RULES:
- Use ONLY information from the document. No external facts.
- source_excerpt must be copied from the text (you may trim for brevity).

OUTPUT FORMAT (valid JSON):
{{
  "insights": [
    {{"title": "...", "summary": "...", "source_excerpt": "..."}}
  ]
}}

{document}
"#,
        hint = label.as_str(),
        document = document_block(text, INSIGHTS_BUDGET)
    )
}

pub fn themes(text: &str) -> String {
    format!(
        r#"You are an expert at identifying high-level themes in documents.

TASK:
Extract ONLY the major themes present in the following text.
Return 3-6 themes MAX.

STRICT RULES:
- Themes must come DIRECTLY from the document.
- DO NOT invent topics that are not mentioned.
- Keep theme names short (2-5 words).

FORMAT:
Return a simple bullet list:
- Theme 1
- Theme 2
- Theme 3

{document}
"#,
        document = document_block(text, THEMES_BUDGET)
    )
}

/// Question answering restricted to the document text.
pub fn answer(text: &str, question: &str, label: Option<CanonicalLabel>) -> String {
    format!(
        r#"You are an assistant answering questions about a single {hint}.

USER QUESTION:
{question}

RULES:
- Use ONLY the document text below.
- If the answer is not clearly stated, say:
  "{no_answer}"
- Be concise (4-8 sentences).
- Provide up to 3 short supporting excerpts, quoted verbatim from the text.

Return JSON exactly in this format:
{{
  "answer": "<short answer>",
  "supporting_excerpts": ["<quote 1>", "<quote 2>"]
}}

DOCUMENT:
{text}
"#,
        hint = type_hint(label),
        question = question.trim(),
        no_answer = super::NO_CLEAR_ANSWER,
        text = truncate_chars(text, QA_BUDGET)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_is_boundary_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_classify_prompt_bounded() {
        let text = "x".repeat(10_000);
        let prompt = classify(&text);
        assert!(prompt.contains("annual_report"));
        assert!(prompt.matches('x').count() <= CLASSIFIER_BUDGET + 10);
    }

    #[test]
    fn test_full_analysis_names_all_fields() {
        let prompt = full_analysis("Body", CanonicalLabel::Contract);
        for field in [
            "quick_preview",
            "executive_summary",
            "themes",
            "key_insights",
            "categories",
            "follow_up_actions",
        ] {
            assert!(prompt.contains(field), "missing {}", field);
        }
        assert!(prompt.contains("single contract document"));
    }

    #[test]
    fn test_answer_prompt_defaults_hint() {
        let prompt = answer("Body", "  What is owed? ", None);
        assert!(prompt.contains("a single document"));
        assert!(prompt.contains("What is owed?\n"));
    }
}
