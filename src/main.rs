// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, written to stderr so --json stays clean)
// 2. Parse command-line arguments using clap
// 3. Build the crawl session for the chosen mode
// 4. Run it and print the report
// 5. Exit with proper code (0 = all pages saved, 1 = some pages failed,
//    2 = the session itself could not start)
//
// Rust concepts used:
// - async/await: Pages are rendered concurrently
// - Result<T, E>: Session errors bubble up with `?` and become exit code 2
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - crawl and render settings
mod crawl;         // src/crawl/ - sessions, frontier and the crawl loop
mod extract;       // src/extract/ - DOM cleanup and markdown conversion
mod output;        // src/output/ - markdown files and URL manifests
mod render;        // src/render/ - turning a URL into an idle page

use std::path::Path;

use clap::Parser;  // Parser trait enables the parse() method
use cli::{Cli, CommonArgs, Commands};
use config::CrawlConfig;
use crawl::{CrawlReport, CrawlSession, Crawler, PageOutcome, SessionError, SessionState};
use render::HttpRenderer;

use anyhow::Result;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Anything reaching here stopped the whole session
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr; RUST_LOG overrides the default "info" level
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = every page was saved
//   Ok(1) = at least one page failed
//   Err = the session could not start (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            url,
            follow,
            max_depth,
            max_pages,
            common,
        } => {
            let config = CrawlConfig {
                link_policy: follow,
                max_depth,
                max_pages,
                ..common.crawl_config()
            };
            let session = CrawlSession::recursive(&url).map_err(session_failed)?;
            handle_session(session, config, &common).await
        }
        Commands::Page { url, common } => {
            let session = CrawlSession::single_page(&url).map_err(session_failed)?;
            handle_session(session, common.crawl_config(), &common).await
        }
        Commands::Batch { manifest, common } => {
            let session = batch_session(&manifest).map_err(session_failed)?;
            handle_session(session, common.crawl_config(), &common).await
        }
    }
}

// Reads the seed manifest and builds a batch session from it
fn batch_session(manifest: &Path) -> Result<CrawlSession, SessionError> {
    let seeds = crawl::load_seed_manifest(manifest)?;
    CrawlSession::batch(&seeds)
}

// Logs a session that failed before any page was started
// Returns: the error, ready for `?` (exit code 2)
fn session_failed<E>(e: E) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    error!(state = %SessionState::Failed, error = %e, "session could not start");
    e.into()
}

// Runs one session with the built-in HTTP renderer
// Parameters:
//   session: validated seeds and mode
//   config: crawl settings built from the flags
//   common: the shared flags (for --json)
async fn handle_session(session: CrawlSession, config: CrawlConfig, common: &CommonArgs) -> Result<i32> {
    if !common.json {
        println!("🔍 Harvesting {} ({} seed(s))", session.primary_seed(), session.seeds().len());
        println!("📁 Output: {}", config.output_dir.display());
    }

    let renderer = HttpRenderer::new(&config.render).map_err(session_failed)?;
    let crawler = Crawler::new(renderer, config);
    let report = crawler.run(session).await;

    print_results(&report, common.json)?;

    if report.failed_count() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the report either as a table or JSON
fn print_results(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints the report as a human-readable table in the terminal
fn print_table(report: &CrawlReport) {
    println!();
    println!("{:<60} {:<12} {:<40}", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(112));

    for page in &report.pages {
        let (status, detail) = match &page.outcome {
            PageOutcome::Saved { path, .. } => ("✅ SAVED", path.display().to_string()),
            PageOutcome::Failed { error } => ("❌ FAILED", error.clone()),
        };

        println!("{:<60} {:<12} {:<40}", truncate_url(&page.url), status, detail);
    }

    println!();
    println!("📊 Summary ({}):", report.domain_key);
    println!("   ✅ Saved: {}", report.saved_count());
    println!("   ❌ Failed: {}", report.failed_count());
    if report.not_started > 0 {
        println!("   ⏸️  Not started (page limit): {}", report.not_started);
    }
    println!("   📋 Total: {}", report.pages.len());
}

// Shortens long URLs so the table columns line up
fn truncate_url(url: &str) -> String {
    if url.chars().count() > 57 {
        format!("{}...", url.chars().take(57).collect::<String>())
    } else {
        url.to_string()
    }
}
