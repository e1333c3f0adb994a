// src/config.rs
// =============================================================================
// Runtime settings for one crawl, built from the command line.
//
// The CLI layer (cli.rs) only parses flags; everything below it receives
// these plain structs, which keeps tests free of argument parsing.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::crawl::LinkPolicy;

/// How pages are fetched and when they count as idle.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub timeout: Duration,
    pub idle_window: Duration,
    pub user_agent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            idle_window: Duration::from_millis(500),
            user_agent: format!("page-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Crawl-wide settings shared by every mode.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Directory holding `scraped_pages/` and `url_list/`
    pub output_dir: PathBuf,
    /// Pages rendered at the same time
    pub concurrency: usize,
    /// Which discovered links recursive mode follows
    pub link_policy: LinkPolicy,
    /// Link hops from the seed; `None` means unlimited
    pub max_depth: Option<usize>,
    /// Pages started per session; `None` means unlimited
    pub max_pages: Option<usize>,
    pub render: RenderConfig,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            concurrency: 4,
            link_policy: LinkPolicy::default(),
            max_depth: None,
            max_pages: None,
            render: RenderConfig::default(),
        }
    }
}
