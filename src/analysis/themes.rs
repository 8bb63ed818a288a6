//! Theme normalisation and lenient theme-list parsing.

use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

/// Substituted when no theme survives normalisation.
pub const NO_THEMES_SENTINEL: &str = "No clear themes identified";

/// Maximum visible characters per theme, ellipsis included.
pub const MAX_THEME_CHARS: usize = 80;

/// Maximum number of themes kept.
pub const MAX_THEMES: usize = 6;

const ELLIPSIS: char = '…';

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-•*]|\d+[).])\s*(.+)$").expect("valid regex"));
static LIST_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",|;|\band\b").expect("valid regex"));
static LEADING_ENUMERATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-\d).\s]+").expect("valid regex"));
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(.*?\)\s*").expect("valid regex"));
static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-&/]").expect("valid regex"));
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("valid regex"));

const STOP_WORDS: &[&str] = &[
    "the", "and", "of", "to", "in", "a", "for", "is", "with", "that", "on", "as", "are", "by",
    "this", "an", "be", "or", "has", "at", "from", "was", "it", "their", "which", "its",
];

/// Shorten a theme to at most [`MAX_THEME_CHARS`] characters, breaking on
/// the last space and appending an ellipsis.
pub fn truncate_theme(theme: &str) -> String {
    if theme.chars().count() <= MAX_THEME_CHARS {
        return theme.to_string();
    }
    let prefix: String = theme.chars().take(MAX_THEME_CHARS).collect();
    let mut cut = match prefix.rsplit_once(' ') {
        Some((head, _)) if !head.trim().is_empty() => head.trim_end().to_string(),
        _ => prefix.clone(),
    };
    if cut.chars().count() >= MAX_THEME_CHARS {
        cut = cut.chars().take(MAX_THEME_CHARS - 1).collect();
    }
    cut.push(ELLIPSIS);
    cut
}

/// Trim, truncate and cap themes; never returns an empty list.
pub fn normalize_themes<I, S>(themes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut clean: Vec<String> = themes
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .map(|t| truncate_theme(&t))
        .take(MAX_THEMES)
        .collect();

    if clean.is_empty() {
        clean.push(NO_THEMES_SENTINEL.to_string());
    }
    clean
}

/// Parse a loosely formatted theme list out of model text.
///
/// Accepts bullets, numbered items, `Label: a, b and c` lines, comma lists
/// and short bare lines.
pub fn parse_theme_list(raw: &str) -> Vec<String> {
    let normalized = raw.replace('\u{2022}', "-");
    let mut themes: Vec<String> = Vec::new();

    for line in normalized.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = BULLET_LINE.captures(line) {
            themes.push(caps[1].trim().to_string());
            continue;
        }

        if line.contains(':') && line.len() < 200 {
            if let Some((_, right)) = line.split_once(':') {
                themes.extend(
                    LIST_SPLIT
                        .split(right)
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string),
                );
            }
            continue;
        }

        if line.contains(',') && line.len() < 200 {
            themes.extend(
                line.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
            );
            continue;
        }

        if line.split_whitespace().count() <= 8 {
            themes.push(line.to_string());
        }
    }

    let mut seen = HashSet::new();
    themes
        .into_iter()
        .map(|t| {
            LEADING_ENUMERATION
                .replace(&t, "")
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string()
        })
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

/// Most frequent non-stop-words, title-cased.
pub fn frequency_themes(text: &str, max_items: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut counts: IndexMap<&str, usize> = IndexMap::new();

    for m in WORD.find_iter(&lower) {
        let word = m.as_str();
        if STOP_WORDS.contains(&word) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    // Stable sort keeps first-seen order among ties
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
        .into_iter()
        .take(max_items)
        .map(|(w, _)| title_case(w))
        .collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn shorten_to_words(s: &str, n: usize) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() <= n {
        return s.to_string();
    }
    let mut short = words[..n]
        .join(" ")
        .trim_end_matches([' ', ',', ';', ':'])
        .to_string();
    short.push(ELLIPSIS);
    short
}

/// Map recurring financial-reporting topics to a friendly name.
fn friendly_topic(s: &str) -> String {
    let low = s.to_lowercase();
    let mapped = if low.contains("compli")
        || low.contains("frs")
        || low.contains("companies act")
        || low.contains("sorp")
    {
        "Regulatory Compliance"
    } else if low.contains("audit") || low.contains("independent") {
        "Audit & Opinion"
    } else if low.contains("true and fair") || low.contains("fair view") {
        "Financial Reporting"
    } else if low.contains("going concern") {
        "Going Concern"
    } else if low.contains("director") || low.contains("governance") {
        "Governance / Directors"
    } else if low.contains("risk") {
        "Risk Factors"
    } else {
        return s.to_string();
    };
    mapped.to_string()
}

/// Clean, shorten, relabel and de-duplicate theme candidates.
pub fn tidy_themes(items: &[String], max_items: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for raw in items {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let text = PARENTHETICAL.replace_all(text, " ");
        let text = DISALLOWED_CHARS.replace_all(text.trim(), "");
        let text = friendly_topic(&shorten_to_words(text.trim(), 5));
        if text.is_empty() || !seen.insert(text.to_lowercase()) {
            continue;
        }
        out.push(text);
        if out.len() >= max_items {
            break;
        }
    }
    out
}

/// Themes from a bullet-list model response, with a word-frequency
/// fallback over the document when the response yields nothing.
pub fn themes_from_response(raw: &str, document_text: &str) -> Vec<String> {
    let parsed: Vec<String> = parse_theme_list(raw).into_iter().take(MAX_THEMES).collect();

    if !parsed.is_empty() {
        let mut processed = tidy_themes(&parsed, MAX_THEMES);
        if processed.len() < 3 {
            let known: HashSet<String> = processed.iter().map(|p| p.to_lowercase()).collect();
            let needed = 3 - processed.len();
            processed.extend(
                parsed
                    .iter()
                    .filter(|p| !known.contains(&p.to_lowercase()))
                    .take(needed)
                    .cloned(),
            );
        }
        if !processed.is_empty() {
            processed.truncate(MAX_THEMES);
            return processed;
        }
    }

    tidy_themes(&frequency_themes(document_text, MAX_THEMES), MAX_THEMES)
}
