//! Hybrid document classifier: ordered keyword rules, then the model.

use tracing::{debug, info, warn};

use super::prompts;
use super::types::CanonicalLabel;
use crate::llm::{GenerateOptions, GenerativeBackend};

/// Keyword rules in precedence order. The first rule with any matching
/// phrase wins, even when a later rule matches more phrases.
const RULES: &[(CanonicalLabel, &[&str])] = &[
    (
        CanonicalLabel::Contract,
        &[
            "this agreement",
            "scope of services",
            "hereinafter",
            "indemnif",
            "governing law",
            "terms and conditions",
            "witnesseth",
            "in witness whereof",
        ],
    ),
    (
        CanonicalLabel::AnnualReport,
        &[
            "annual report",
            "form 10-k",
            "10-k",
            "fiscal year ended",
            "report of the directors",
            "independent auditor's report",
        ],
    ),
    (
        CanonicalLabel::QuarterlyReport,
        &[
            "form 10-q",
            "10-q",
            "quarterly report",
            "three months ended",
            "quarter ended",
        ],
    ),
    (
        CanonicalLabel::EarningsCall,
        &[
            "earnings call",
            "conference call",
            "question-and-answer session",
            "prepared remarks",
            "operator:",
        ],
    ),
    (
        CanonicalLabel::MarketAnalysis,
        &[
            "market analysis",
            "market size",
            "cagr",
            "competitive landscape",
            "market share",
            "industry outlook",
        ],
    ),
    (
        CanonicalLabel::Mou,
        &["memorandum of understanding", "m.o.u."],
    ),
    (
        CanonicalLabel::Sla,
        &[
            "service level agreement",
            "service credits",
            "uptime commitment",
            "availability target",
            "response time targets",
        ],
    ),
];

/// Rule stage only: the first rule with a matching phrase.
pub fn classify_by_rules(text: &str) -> Option<CanonicalLabel> {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| lower.contains(p)))
        .map(|(label, _)| *label)
}

/// Map free-form model output onto a label.
///
/// Labels are probed in canonical order and the first one found anywhere in
/// the response wins; nothing recognisable resolves to `General`.
pub fn sanitize_label(response: &str) -> CanonicalLabel {
    let lower = response.to_lowercase();
    CanonicalLabel::ALL
        .into_iter()
        .find(|label| {
            let name = label.as_str();
            lower.contains(name) || lower.contains(&name.replace('_', " "))
        })
        .unwrap_or(CanonicalLabel::General)
}

/// Classify a document. Never fails: backend errors resolve to `General`.
pub async fn classify(text: &str, backend: &dyn GenerativeBackend) -> CanonicalLabel {
    if let Some(label) = classify_by_rules(text) {
        info!("Classified as {} by keyword rules", label);
        return label;
    }

    let prompt = prompts::classify(text);
    match backend.generate(&prompt, &GenerateOptions::terse()).await {
        Ok(response) => {
            debug!("Classifier response: {:?}", response.trim());
            let label = sanitize_label(&response);
            info!("Classified as {} by model", label);
            label
        }
        Err(e) => {
            warn!("Classifier model call failed, using general: {}", e);
            CanonicalLabel::General
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedBackend;

    #[test]
    fn test_each_rule_matches_its_label() {
        let cases = [
            ("This Agreement is made between...", CanonicalLabel::Contract),
            ("Annual Report 2023", CanonicalLabel::AnnualReport),
            ("For the three months ended March 31", CanonicalLabel::QuarterlyReport),
            ("Operator: Good morning everyone", CanonicalLabel::EarningsCall),
            ("The market size is expected to reach", CanonicalLabel::MarketAnalysis),
            ("Memorandum of Understanding between", CanonicalLabel::Mou),
            ("Service Level Agreement for hosting", CanonicalLabel::Sla),
        ];
        for (text, expected) in cases {
            assert_eq!(classify_by_rules(text), Some(expected), "{}", text);
        }
    }

    #[test]
    fn test_first_rule_wins() {
        // Matches annual_report and earnings_call; annual_report is earlier.
        let text = "Earnings call transcript. Conference call. Annual report attached.";
        assert_eq!(classify_by_rules(text), Some(CanonicalLabel::AnnualReport));

        // A service level agreement that also says "this agreement" is a contract.
        let text = "This Agreement sets out the Service Level Agreement.";
        assert_eq!(classify_by_rules(text), Some(CanonicalLabel::Contract));
    }

    #[test]
    fn test_mou_does_not_match_amount() {
        assert_eq!(classify_by_rules("The total amount is due."), None);
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Label: annual_report"), CanonicalLabel::AnnualReport);
        assert_eq!(sanitize_label("EARNINGS CALL"), CanonicalLabel::EarningsCall);
        assert_eq!(sanitize_label("I think it's a poem"), CanonicalLabel::General);
        assert_eq!(sanitize_label(""), CanonicalLabel::General);
    }

    #[test]
    fn test_sanitize_label_prefers_canonical_order() {
        assert_eq!(
            sanitize_label("annual_report, or maybe a contract"),
            CanonicalLabel::Contract
        );
        assert_eq!(sanitize_label("general, possibly an sla"), CanonicalLabel::Sla);
        assert_eq!(
            sanitize_label("earnings call or quarterly report"),
            CanonicalLabel::QuarterlyReport
        );
    }

    #[tokio::test]
    async fn test_rule_match_skips_backend() {
        let backend = ScriptedBackend::new();
        let label = classify("Scope of Services: cleaning", &backend).await;
        assert_eq!(label, CanonicalLabel::Contract);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_fallback() {
        let backend = ScriptedBackend::new().reply("market_analysis\n");
        let label = classify("A plain memo about lunch.", &backend).await;
        assert_eq!(label, CanonicalLabel::MarketAnalysis);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_is_general() {
        let backend = ScriptedBackend::new().fail();
        let label = classify("A plain memo about lunch.", &backend).await;
        assert_eq!(label, CanonicalLabel::General);
    }
}
