//! Shared helper functions for CLI commands.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::{AnalysisEngine, CanonicalLabel};
use crate::config::Config;
use crate::llm::BackendHandle;
use crate::text::{load_document, Document};

/// Engine over the configured backend; the backend is built on first use.
pub fn engine(config: &Config) -> AnalysisEngine {
    AnalysisEngine::new(Arc::new(BackendHandle::new(config.llm.clone())))
}

/// Load a document, failing when the file is missing.
pub fn load(file: &Path) -> anyhow::Result<Document> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    Ok(load_document(file))
}

/// Spinner for a single long-running step.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Parse an optional `--doc-type` value.
pub fn label_hint(doc_type: Option<&str>) -> Option<CanonicalLabel> {
    doc_type.map(CanonicalLabel::parse)
}

/// Print a section heading.
pub fn heading(title: &str) {
    println!("\n{}", style(title).bold());
}

/// Page suffix for a citation, empty when the page is unknown.
pub fn page_suffix(page: Option<u32>) -> String {
    match page {
        Some(p) => format!(" {}", style(format!("(p. {})", p)).dim()),
        None => String::new(),
    }
}
