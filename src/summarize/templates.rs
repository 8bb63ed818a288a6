//! Default section plans per document type.

use crate::analysis::CanonicalLabel;

/// A planned section with guidance for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTemplate {
    pub title: &'static str,
    pub guidance: &'static str,
}

const fn section(title: &'static str, guidance: &'static str) -> SectionTemplate {
    SectionTemplate { title, guidance }
}

const ANNUAL_REPORT: &[SectionTemplate] = &[
    section(
        "Executive Summary",
        "Provide a concise 3-5 sentence overview of the company's performance and key developments.",
    ),
    section(
        "Financial Highlights",
        "Summarize revenues, expenses, margins, notable financial movements, and liquidity concerns.",
    ),
    section(
        "Risks & Disclosures",
        "Summarize major risks, uncertainties, and important disclosures.",
    ),
    section(
        "Management Commentary",
        "Summarize the tone, sentiment, and key commentary from management.",
    ),
    section(
        "Outlook",
        "Summarize guidance, expectations, and near-term focus areas.",
    ),
];

const EARNINGS_CALL: &[SectionTemplate] = &[
    section("Quarter Summary", "Provide top highlights of the quarter."),
    section("Growth Drivers", "Summarize the factors contributing to growth."),
    section("Risks & Headwinds", "Identify challenges or negative themes."),
    section(
        "Guidance & Outlook",
        "Summarize management's outlook for the next period.",
    ),
    section(
        "Notable Q&A Insights",
        "Extract insights surfaced during Q&A sections.",
    ),
];

const CONTRACT: &[SectionTemplate] = &[
    section(
        "Parties & Purpose",
        "Summarize who the agreement is between and why.",
    ),
    section("Key Obligations", "Summarize obligations of each party."),
    section(
        "Payment & Financial Terms",
        "Summarize payment structure and obligations.",
    ),
    section(
        "Liability & Indemnification",
        "Summarize liability, warranties, indemnities.",
    ),
    section(
        "Termination Conditions",
        "Summarize how and when the agreement can end.",
    ),
];

const GENERAL: &[SectionTemplate] = &[
    section("Executive Summary", "Provide the 3-5 most important ideas."),
    section("Key Topics", "Summarize the main themes discussed."),
    section("Important Details", "Summarize supporting details."),
];

/// Template for a label; labels without their own plan use the general one.
pub fn template_for(label: CanonicalLabel) -> &'static [SectionTemplate] {
    match label {
        CanonicalLabel::AnnualReport => ANNUAL_REPORT,
        CanonicalLabel::EarningsCall => EARNINGS_CALL,
        CanonicalLabel::Contract => CONTRACT,
        _ => GENERAL,
    }
}
