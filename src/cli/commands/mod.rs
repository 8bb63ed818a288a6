//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod ask;
mod check;
mod helpers;
mod serve;
mod summarize;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analysis::QuestionSource;
use crate::config::Config;
use crate::summarize::{Depth, OutputFormat};

#[derive(Parser)]
#[command(name = "pagewise")]
#[command(about = "Citation-backed document analysis")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a document and extract themes, insights and follow-ups
    Analyze {
        /// PDF or text file
        file: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a document section by section
    Summarize {
        /// PDF or text file
        file: PathBuf,
        /// Section topic, in order (repeatable; defaults to the document type's template)
        #[arg(short, long = "section")]
        sections: Vec<String>,
        /// Output format: bullets or narrative
        #[arg(short, long, default_value = "bullets")]
        format: OutputFormat,
        /// Detail level: quick, medium or deep
        #[arg(short, long, default_value = "medium")]
        depth: Depth,
        /// Document type used to pick the default sections (e.g. contract)
        #[arg(long)]
        doc_type: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask a question about a document
    Ask {
        /// PDF or text file
        file: PathBuf,
        /// The question
        question: String,
        /// Document type hint (e.g. annual_report)
        #[arg(long)]
        doc_type: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a suggested follow-up action against a document
    Followup {
        /// PDF or text file
        file: PathBuf,
        /// Follow-up action text
        action: String,
        /// Document type hint (e.g. annual_report)
        #[arg(long)]
        doc_type: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check text extraction tools and the generative backend
    Check,

    /// Start the HTTP API
    Serve {
        /// Address to bind to (port, host, or host:port)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_discover(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Analyze { file, json } => analyze::cmd_analyze(&config, &file, json).await,
        Commands::Summarize {
            file,
            sections,
            format,
            depth,
            doc_type,
            json,
        } => {
            summarize::cmd_summarize(
                &config,
                &file,
                summarize::SummarizeArgs {
                    sections,
                    format,
                    depth,
                    doc_type,
                    json,
                },
            )
            .await
        }
        Commands::Ask {
            file,
            question,
            doc_type,
            json,
        } => {
            ask::cmd_ask(
                &config,
                &file,
                &question,
                doc_type.as_deref(),
                QuestionSource::Ask,
                json,
            )
            .await
        }
        Commands::Followup {
            file,
            action,
            doc_type,
            json,
        } => {
            ask::cmd_ask(
                &config,
                &file,
                &action,
                doc_type.as_deref(),
                QuestionSource::Followup,
                json,
            )
            .await
        }
        Commands::Check => check::cmd_check(&config).await,
        Commands::Serve { bind } => serve::cmd_serve(&config, bind.as_deref()).await,
    }
}
