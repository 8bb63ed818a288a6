//! Document analysis command.

use std::path::Path;

use console::style;

use super::helpers::{engine, heading, load, page_suffix, spinner};
use crate::analysis::{AnalysisPath, AnalysisResult};
use crate::config::Config;

/// Analyze a document and print the result.
pub async fn cmd_analyze(config: &Config, file: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load(file)?;
    let engine = engine(config);

    let pb = spinner(&format!("Analyzing {}...", file.display()));
    let result = engine.analyze(&doc).await;
    pb.finish_and_clear();
    let result = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_analysis(&result);
    }
    Ok(())
}

fn print_analysis(result: &AnalysisResult) {
    println!(
        "{} {} ({})",
        style("Document type:").bold(),
        style(result.doc_type()).cyan(),
        result.label
    );
    if result.path == AnalysisPath::Legacy {
        println!(
            "  {} Structured extraction failed; fields built from separate calls",
            style("!").yellow()
        );
    }

    heading("Quick Preview");
    println!("{}", result.quick_preview);

    heading("Executive Summary");
    println!("{}", result.executive_summary);

    heading("Themes");
    for theme in &result.themes {
        println!("  {} {}", style("•").cyan(), theme);
    }

    if !result.key_insights.is_empty() {
        heading("Key Insights");
        for insight in &result.key_insights {
            println!(
                "  {} {}{}",
                style("→").green(),
                style(&insight.title).bold(),
                page_suffix(insight.page)
            );
            println!("    {}", insight.summary);
            if !insight.source_excerpt.is_empty() {
                println!("    {}", style(format!("\"{}\"", insight.source_excerpt)).dim());
            }
        }
    }

    if !result.categories.is_empty() {
        heading("Categories");
        for category in &result.categories {
            println!(
                "  {} {} {}",
                style("→").green(),
                style(&category.title).bold(),
                style(format!("[{}]", category.key)).dim()
            );
            if !category.summary.is_empty() {
                println!("    {}", category.summary);
            }
            for snippet in &category.snippets {
                println!(
                    "    {}{}",
                    style(format!("\"{}\"", snippet.text)).dim(),
                    page_suffix(snippet.page)
                );
            }
        }
    }

    if !result.follow_up_actions.is_empty() {
        heading("Suggested Follow-ups");
        for action in &result.follow_up_actions {
            println!("  {} {}", style("?").cyan(), action);
        }
    }
}
