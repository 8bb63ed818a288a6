//! Section summary command.

use std::path::Path;

use console::style;

use super::helpers::{engine, heading, label_hint, load, spinner};
use crate::config::Config;
use crate::summarize::{Depth, OutputFormat, SectionRequest, NOT_DISCUSSED};

pub struct SummarizeArgs {
    pub sections: Vec<String>,
    pub format: OutputFormat,
    pub depth: Depth,
    pub doc_type: Option<String>,
    pub json: bool,
}

/// Summarize a document section by section.
pub async fn cmd_summarize(config: &Config, file: &Path, args: SummarizeArgs) -> anyhow::Result<()> {
    let doc = load(file)?;
    let engine = engine(config);

    // Without an explicit plan the template follows the document type
    let label = match label_hint(args.doc_type.as_deref()) {
        Some(label) => Some(label),
        None if args.sections.is_empty() => Some(engine.classify(&doc.text).await),
        None => None,
    };

    let request = SectionRequest {
        plan: args.sections,
        format: args.format,
        depth: args.depth,
        label,
    };

    let pb = spinner("Summarizing sections...");
    let summary = engine.summarize(&doc.text, &request).await;
    pb.finish_and_clear();
    let summary = summary?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for (title, body) in &summary.sections {
        heading(title);
        if body == NOT_DISCUSSED {
            println!("{}", style(body).dim());
        } else {
            println!("{}", body);
        }
    }

    if !summary.narrative.is_empty() {
        heading("Combined");
        println!("{}", summary.narrative);
    }
    Ok(())
}
