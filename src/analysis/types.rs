//! Analysis data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of document types.
///
/// `ALL` is the canonical order, used when sanitising free-form
/// classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalLabel {
    Contract,
    AnnualReport,
    QuarterlyReport,
    EarningsCall,
    MarketAnalysis,
    Mou,
    Sla,
    #[default]
    General,
}

impl CanonicalLabel {
    pub const ALL: [CanonicalLabel; 8] = [
        CanonicalLabel::Contract,
        CanonicalLabel::AnnualReport,
        CanonicalLabel::QuarterlyReport,
        CanonicalLabel::EarningsCall,
        CanonicalLabel::MarketAnalysis,
        CanonicalLabel::Mou,
        CanonicalLabel::Sla,
        CanonicalLabel::General,
    ];

    /// Machine label, as used in prompts and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalLabel::Contract => "contract",
            CanonicalLabel::AnnualReport => "annual_report",
            CanonicalLabel::QuarterlyReport => "quarterly_report",
            CanonicalLabel::EarningsCall => "earnings_call",
            CanonicalLabel::MarketAnalysis => "market_analysis",
            CanonicalLabel::Mou => "mou",
            CanonicalLabel::Sla => "sla",
            CanonicalLabel::General => "general",
        }
    }

    /// Human-friendly name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            CanonicalLabel::Contract => "Legal Contract",
            CanonicalLabel::AnnualReport => "Annual Report / 10-K",
            CanonicalLabel::QuarterlyReport => "Quarterly Earnings / 10-Q",
            CanonicalLabel::EarningsCall => "Earnings Call Transcript",
            CanonicalLabel::MarketAnalysis => "Market Analysis Report",
            CanonicalLabel::Mou => "Memorandum of Understanding (MoU)",
            CanonicalLabel::Sla => "Service Terms / SLA",
            CanonicalLabel::General => "Other",
        }
    }

    /// Parse a machine label; anything unrecognised is `General`.
    pub fn parse(s: &str) -> Self {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == wanted)
            .unwrap_or(CanonicalLabel::General)
    }

    /// Financial reporting documents.
    pub fn is_financial(&self) -> bool {
        matches!(
            self,
            CanonicalLabel::AnnualReport
                | CanonicalLabel::QuarterlyReport
                | CanonicalLabel::EarningsCall
                | CanonicalLabel::MarketAnalysis
        )
    }

    /// Agreements between parties.
    pub fn is_agreement(&self) -> bool {
        matches!(
            self,
            CanonicalLabel::Contract | CanonicalLabel::Mou | CanonicalLabel::Sla
        )
    }
}

impl fmt::Display for CanonicalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key finding backed by a verbatim excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub summary: String,
    pub source_excerpt: String,
    /// 1-indexed page of the excerpt, `None` when it could not be located.
    pub page: Option<u32>,
}

impl Insight {
    /// Page for numeric contexts; 0 means unknown.
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(0)
    }
}

/// A verbatim snippet with its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub page: Option<u32>,
}

/// A categorized finding (fast path only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub title: String,
    pub summary: String,
    pub snippets: Vec<Snippet>,
}

/// An excerpt resolved against page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub excerpt: String,
    pub page: Option<u32>,
}

impl Citation {
    /// Page for numeric contexts; 0 means unknown.
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(0)
    }
}

/// Which strategy produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPath {
    /// Single structured call.
    Fast,
    /// Multi-call fallback pipeline.
    Legacy,
}

/// Complete analysis of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub label: CanonicalLabel,
    pub quick_preview: String,
    pub executive_summary: String,
    pub themes: Vec<String>,
    pub key_insights: Vec<Insight>,
    pub categories: Vec<Category>,
    pub follow_up_actions: Vec<String>,
    pub path: AnalysisPath,
}

impl AnalysisResult {
    pub fn doc_type(&self) -> &'static str {
        self.label.display_name()
    }
}

/// Where a question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    #[default]
    Ask,
    Followup,
}

/// Answer to a question about one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub supporting_excerpts: Vec<Citation>,
    pub source: QuestionSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse_roundtrip_and_fallback() {
        for label in CanonicalLabel::ALL {
            assert_eq!(CanonicalLabel::parse(label.as_str()), label);
        }
        assert_eq!(
            CanonicalLabel::parse("Annual Report"),
            CanonicalLabel::AnnualReport
        );
        assert_eq!(CanonicalLabel::parse("poem"), CanonicalLabel::General);
    }

    #[test]
    fn test_label_serializes_snake_case() {
        let json = serde_json::to_string(&CanonicalLabel::EarningsCall).unwrap();
        assert_eq!(json, "\"earnings_call\"");
        assert_eq!(CanonicalLabel::Sla.display_name(), "Service Terms / SLA");
    }

    #[test]
    fn test_unknown_page_is_zero() {
        let citation = Citation {
            excerpt: "x".to_string(),
            page: None,
        };
        assert_eq!(citation.page_number(), 0);
    }
}
