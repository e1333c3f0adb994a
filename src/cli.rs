// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// One subcommand per crawl mode:
//   crawl <URL>        follow links from one page across the site
//   page <URL>         save just one page
//   batch <MANIFEST>   save every URL listed in a CSV file
//
// The flags every mode shares live in `CommonArgs` and are flattened into
// each subcommand, so `--output-dir` works after any of them.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{CrawlConfig, RenderConfig};
use crate::crawl::LinkPolicy;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "page-harvest",
    version,
    about = "A CLI tool to crawl websites and save each page's main content as markdown",
    long_about = "page-harvest renders pages, strips navigation and other page chrome, and \
                  writes the remaining content to scraped_pages/<domain>/ as markdown. \
                  Every saved URL is appended to url_list/<domain>_urls.csv, which can be \
                  fed back in with the batch command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website starting from one page, following its links
    ///
    /// Example: page-harvest crawl https://example.com --follow same-domain
    Crawl {
        /// Starting URL (e.g., https://example.com)
        url: String,

        /// Which discovered links to follow
        #[arg(long, value_enum, default_value_t = LinkPolicy::SameHost)]
        follow: LinkPolicy,

        /// Maximum link hops from the starting page (unlimited if omitted)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Stop starting new pages after this many (unlimited if omitted)
        #[arg(long)]
        max_pages: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Save a single page without following any links
    ///
    /// Example: page-harvest page https://example.com/docs/intro
    Page {
        /// URL of the page to save
        url: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Save every URL listed in the first column of a CSV file
    ///
    /// All pages share the output folder of the first URL in the file.
    ///
    /// Example: page-harvest batch url_list/examplecom_urls.csv
    Batch {
        /// CSV file with one URL per row (rows starting with # are skipped)
        manifest: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Directory receiving scraped_pages/ and url_list/
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of pages rendered at the same time
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Quiet period (milliseconds) after loading before a page counts as idle
    #[arg(long, default_value_t = 500)]
    pub idle_ms: u64,

    /// Per-page request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Output the crawl report in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CommonArgs {
    /// Builds the crawl settings; mode-specific fields keep their defaults.
    pub fn crawl_config(&self) -> CrawlConfig {
        let defaults = RenderConfig::default();
        CrawlConfig {
            output_dir: self.output_dir.clone(),
            concurrency: self.concurrency,
            render: RenderConfig {
                timeout: Duration::from_secs(self.timeout_secs),
                idle_window: Duration::from_millis(self.idle_ms),
                user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            },
            ..CrawlConfig::default()
        }
    }
}
