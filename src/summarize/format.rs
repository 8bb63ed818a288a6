//! Output format enforcement.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// How summary text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Bullets,
    Narrative,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Bullets => "bullets",
            OutputFormat::Narrative => "narrative",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bullets" | "bullet" => Ok(OutputFormat::Bullets),
            "narrative" => Ok(OutputFormat::Narrative),
            other => Err(format!("unknown format '{}' (expected bullets or narrative)", other)),
        }
    }
}

static QUOTED_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"',\s*'|",\s*""#).expect("valid regex"));
static LEADING_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•‣▪]\s*|[-*]\s+)+").expect("valid regex"));

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Body of a stringified list such as `['a', 'b']`, if the text has that shape.
fn list_literal_body(text: &str) -> Option<&str> {
    let bracketed = text.starts_with('[') && text.ends_with(']') && text.len() >= 2;
    let body = if bracketed {
        text[1..text.len() - 1].trim()
    } else {
        text
    };

    let quote_wrapped = body.starts_with(is_quote) && body.ends_with(is_quote);
    if (bracketed || quote_wrapped) && QUOTED_COMMA.is_match(body) {
        Some(body)
    } else {
        None
    }
}

fn clean_item(item: &str) -> Option<String> {
    let item = LEADING_MARKERS.replace(item.trim(), "");
    let item = item.trim();
    (!item.is_empty()).then(|| item.to_string())
}

/// Coerce text into the requested format.
///
/// Bullets: one `- ` item per line, existing markers replaced, stringified
/// list literals split into items. Narrative: trimmed text. Applying this
/// to its own output is a no-op.
pub fn enforce(text: &str, format: OutputFormat) -> String {
    let cleaned = text.trim();
    if format == OutputFormat::Narrative {
        return cleaned.to_string();
    }

    let items: Vec<String> = match list_literal_body(cleaned) {
        Some(body) => QUOTED_COMMA
            .split(body)
            .flat_map(|part| part.trim_matches(|c: char| c == ' ' || is_quote(c)).lines())
            .filter_map(clean_item)
            .collect(),
        None => cleaned.lines().filter_map(clean_item).collect(),
    };

    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_replace_markers() {
        let text = "• First point\n* Second point\n\n- Third point\nFourth point";
        assert_eq!(
            enforce(text, OutputFormat::Bullets),
            "- First point\n- Second point\n- Third point\n- Fourth point"
        );
    }

    #[test]
    fn test_stringified_list() {
        let text = "['Revenue grew 12%', 'Margins expanded', 'Debt fell']";
        assert_eq!(
            enforce(text, OutputFormat::Bullets),
            "- Revenue grew 12%\n- Margins expanded\n- Debt fell"
        );

        let text = r#"["One", "Two"]"#;
        assert_eq!(enforce(text, OutputFormat::Bullets), "- One\n- Two");
    }

    #[test]
    fn test_quote_wrapped_list_without_brackets() {
        let text = r#""alpha", "beta""#;
        assert_eq!(enforce(text, OutputFormat::Bullets), "- alpha\n- beta");
    }

    #[test]
    fn test_quoted_comma_inside_prose_is_not_a_list() {
        let text = r#"- He said "yes", "no" and left"#;
        assert_eq!(
            enforce(text, OutputFormat::Bullets),
            r#"- He said "yes", "no" and left"#
        );
    }

    #[test]
    fn test_bullets_idempotent() {
        let inputs = [
            "• a\n•b\n- - c",
            "['x', 'y']",
            "-\n*\n- -x",
            "plain line\n\n  indented line  ",
            "",
            r#"["- one", "• two"]"#,
        ];
        for input in inputs {
            let once = enforce(input, OutputFormat::Bullets);
            let twice = enforce(&once, OutputFormat::Bullets);
            assert_eq!(once, twice, "input {:?}", input);
        }
    }

    #[test]
    fn test_narrative_trims_only() {
        assert_eq!(
            enforce("  - keep\n  this ", OutputFormat::Narrative),
            "- keep\n  this"
        );
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("Narrative".parse::<OutputFormat>(), Ok(OutputFormat::Narrative));
        assert!("json".parse::<OutputFormat>().is_err());
    }
}
