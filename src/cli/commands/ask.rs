//! Question answering and follow-up commands.

use std::path::Path;

use console::style;

use super::helpers::{engine, heading, label_hint, load, page_suffix, spinner};
use crate::analysis::QuestionSource;
use crate::config::Config;

/// Answer a question (or run a follow-up action) against a document.
pub async fn cmd_ask(
    config: &Config,
    file: &Path,
    question: &str,
    doc_type: Option<&str>,
    source: QuestionSource,
    json: bool,
) -> anyhow::Result<()> {
    let doc = load(file)?;
    let engine = engine(config);

    let pb = spinner("Thinking...");
    let answer = engine
        .answer(&doc, question, label_hint(doc_type), source)
        .await;
    pb.finish_and_clear();
    let answer = answer?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    println!("{} {}", style("Q:").cyan().bold(), question.trim());
    println!("{} {}", style("A:").green().bold(), answer.answer);

    if !answer.supporting_excerpts.is_empty() {
        heading("Sources");
        for citation in &answer.supporting_excerpts {
            println!(
                "  {} {}{}",
                style("›").dim(),
                citation.excerpt,
                page_suffix(citation.page)
            );
        }
    }
    Ok(())
}
