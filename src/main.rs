use anyhow::{Context, Result};
use clap::Parser;
use pubmed_bibtex::config::load_config;
use pubmed_bibtex::sources::PubMedSource;
use pubmed_bibtex::utils::{format_bibtex, validate_pmid, HttpClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// PubMed BibTeX - Turn a PubMed ID into a BibTeX entry ready for hand-editing
#[derive(Parser, Debug)]
#[command(name = "pubmed-bibtex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch a PubMed record and print it as a BibTeX entry", long_about = None)]
struct Cli {
    /// PubMed ID of the article (decimal digits only)
    #[arg(value_parser = validate_pmid)]
    pmid: String,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors on stderr
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Log to stderr so stdout carries only the entry
fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = if quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pubmed_bibtex={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(?config, "Configuration loaded");

    let client = HttpClient::with_options(&config.user_agent, config.timeout())?;
    let source = PubMedSource::with_client(Arc::new(client), &config.eutils_url)?;

    let record = source
        .fetch_record(&cli.pmid)
        .await
        .with_context(|| format!("Failed to build citation for PubMed ID {}", cli.pmid))?;
    tracing::info!(pmid = %record.pmid, authors = record.authors.len(), "Record parsed");

    println!("{}", format_bibtex(&record, &config.cite_options()));

    Ok(())
}
