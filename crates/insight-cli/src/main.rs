//! Insight Command-Line Client
//!
//! Loads section and room datasets from JSON files and runs query documents
//! against them.

mod config;
mod error;
mod formatter;
mod loader;

use clap::Parser;
use insight_core::{InMemoryStore, QueryEngine};

use crate::config::{Args, CliConfig};
use crate::error::Result;
use crate::formatter::Formatter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so results on stdout stay machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insight_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config();
    let formatter = formatter::create_formatter(config.format);

    match run(&config, &*formatter).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e.to_string()));
            std::process::exit(e.exit_code());
        }
    }
}

/// Load datasets, then list them and/or run the query.
async fn run(config: &CliConfig, formatter: &dyn Formatter) -> Result<String> {
    config.validate()?;

    let store = InMemoryStore::new();
    loader::load_all(&store, &config.datasets)?;

    let mut sections = Vec::new();

    if config.list {
        sections.push(formatter.format_datasets(&store.list_datasets()));
    }

    if let Some(source) = &config.query {
        let text = source.read()?;
        let engine = QueryEngine::with_config(&store, config.engine.clone());
        let rows = engine.execute_str(&text).await?;
        tracing::info!(rows = rows.len(), "query complete");
        sections.push(formatter.format_results(&rows));
    }

    Ok(sections.join("\n\n"))
}
