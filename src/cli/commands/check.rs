//! Tool availability check.

use console::style;

use crate::config::Config;
use crate::llm::{BackendHandle, GenerativeBackend};
use crate::text::PdfTextProvider;

/// Report which extraction tools and backends are usable.
pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    println!("\n{}", style("Text Extraction Tools").bold());
    let tools = PdfTextProvider::check_tools();
    for (tool, found) in &tools {
        println!(
            "  {:<12} {}",
            tool,
            if *found {
                style("✓ found").green()
            } else {
                style("✗ not found").red()
            }
        );
    }
    if tools.iter().any(|(_, found)| !found) {
        println!(
            "  {}",
            style("Install poppler-utils to analyze PDF files").dim()
        );
    }

    println!("\n{}", style("Generative Backend").bold());
    let llm = &config.llm;
    println!("  Provider:  {:?}", llm.provider);
    println!("  Endpoint:  {}", llm.endpoint);
    println!("  Model:     {}", llm.model);

    if !llm.enabled {
        println!("  {} disabled in configuration", style("○").yellow());
        return Ok(());
    }

    let handle = BackendHandle::new(llm.clone());
    if handle.is_available().await {
        println!("  {} reachable", style("✓").green());
    } else {
        println!(
            "  {} not reachable (analysis will fall back to placeholders)",
            style("✗").red()
        );
    }
    handle.shutdown().await;
    Ok(())
}
