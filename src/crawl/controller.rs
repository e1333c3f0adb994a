// src/crawl/controller.rs
// =============================================================================
// This module drives a crawl session from seeds to saved files.
//
// How it works:
// 1. Mark every seed as visited and put it on the frontier
// 2. Start pages from the front of the frontier, up to `concurrency` at once
// 3. For each page: render, extract, write, then (recursive mode only)
//    keep the links nobody has claimed yet. Links are read from the DOM
//    after noise removal, and scope is checked against where the seed
//    page actually loaded from (redirects included)
// 4. Claimed links go to the back of the frontier
// 5. Stop when the frontier is empty and nothing is in flight
//
// A page that fails at any step is logged and dropped. It is never retried
// and never stops the other pages: per-page errors come back as values in
// the report instead of propagating out of the loop.
//
// Rust concepts:
// - FuturesUnordered: A growing set of in-flight futures, polled together
// - Borrowing across futures: every page future borrows the same context
// =============================================================================

use std::path::PathBuf;

use futures::stream::{FuturesUnordered, StreamExt};
use once_cell::sync::OnceCell;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::frontier::{Frontier, FrontierEntry, VisitedSet};
use super::policy::LinkPolicy;
use super::session::{CrawlMode, CrawlSession, SessionState};
use crate::config::CrawlConfig;
use crate::extract::{extract_markdown, ExtractedDocument};
use crate::output::{OutputError, OutputWriter};
use crate::render::{RenderError, RenderedPage, Renderer};

/// Why a single page was dropped.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Write(#[from] OutputError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    Saved {
        path: PathBuf,
        /// New links this page added to the frontier
        links_enqueued: usize,
    },
    Failed {
        error: String,
    },
}

/// What happened to one URL.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub url: String,
    pub depth: usize,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

impl PageReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, PageOutcome::Saved { .. })
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub mode: CrawlMode,
    pub domain_key: String,
    pub state: SessionState,
    /// Size of the visited set at the end: processed plus still-queued URLs
    pub visited: usize,
    /// URLs left on the frontier because of `max_pages`
    pub not_started: usize,
    pub pages: Vec<PageReport>,
}

impl CrawlReport {
    pub fn saved_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.pages.len() - self.saved_count()
    }
}

/// Everything a page handler needs, created once per session and shared by
/// reference with every page in flight.
pub struct SessionContext {
    session: CrawlSession,
    visited: VisitedSet,
    writer: OutputWriter,
    link_policy: LinkPolicy,
    max_depth: Option<usize>,
    /// Where the first seed page was loaded from, once it has rendered
    seed_loaded_url: OnceCell<Url>,
}

impl SessionContext {
    pub fn new(session: CrawlSession, config: &CrawlConfig) -> Self {
        let writer = OutputWriter::new(&config.output_dir, session.domain_key());
        Self {
            session,
            visited: VisitedSet::new(),
            writer,
            link_policy: config.link_policy,
            max_depth: config.max_depth,
            seed_loaded_url: OnceCell::new(),
        }
    }

    // Remembers where the first seed ended up after redirects
    fn record_loaded(&self, entry: &FrontierEntry, page: &RenderedPage) {
        if entry.depth == 0 && &entry.url == self.session.primary_seed() {
            let _ = self.seed_loaded_url.set(page.loaded_url().clone());
        }
    }

    // A link is in scope relative to the seed as given or to the URL the
    // seed page was loaded from
    fn in_scope(&self, link: &Url) -> bool {
        let seed = self.session.primary_seed();
        self.link_policy.allows(seed, link)
            || self
                .seed_loaded_url
                .get()
                .map_or(false, |loaded| self.link_policy.allows(loaded, link))
    }

    fn within_depth(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}

pub struct Crawler<R> {
    renderer: R,
    config: CrawlConfig,
}

impl<R: Renderer> Crawler<R> {
    pub fn new(renderer: R, config: CrawlConfig) -> Self {
        Self { renderer, config }
    }

    // Runs one session to completion
    //
    // Session-level problems (bad seeds, unreadable manifest) are caught
    // while building the CrawlSession, so by the time we get here the
    // session can only complete; individual pages may still fail.
    pub async fn run(&self, session: CrawlSession) -> CrawlReport {
        let ctx = SessionContext::new(session, &self.config);
        let mut state = SessionState::Idle;
        transition(&mut state, SessionState::Running, &ctx);

        let mut frontier = Frontier::new();
        for seed in ctx.session.seeds() {
            if ctx.visited.try_mark_visited(seed) {
                frontier.push(FrontierEntry::seed(seed.clone()));
            } else {
                debug!(url = %seed, "duplicate seed skipped");
            }
        }

        let concurrency = self.config.concurrency.max(1);
        let mut started = 0usize;
        let mut pages = Vec::new();
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < concurrency && !self.page_limit_reached(started) {
                let Some(entry) = frontier.pop() else { break };
                started += 1;
                in_flight.push(self.handle_page(&ctx, entry));
            }

            let Some((report, discovered)) = in_flight.next().await else {
                break;
            };
            pages.push(report);
            for entry in discovered {
                frontier.push(entry);
            }
        }

        if !frontier.is_empty() {
            info!(remaining = frontier.len(), "page limit reached, rest of frontier dropped");
        }

        transition(&mut state, SessionState::Completed, &ctx);
        let report = CrawlReport {
            mode: ctx.session.mode(),
            domain_key: ctx.session.domain_key().to_string(),
            state,
            visited: ctx.visited.len(),
            not_started: frontier.len(),
            pages,
        };

        info!(
            saved = report.saved_count(),
            failed = report.failed_count(),
            visited = report.visited,
            "crawl finished"
        );
        report
    }

    fn page_limit_reached(&self, started: usize) -> bool {
        self.config.max_pages.map_or(false, |max| started >= max)
    }

    // Processes one page and turns any failure into a report entry
    //
    // Returns: the report plus the frontier entries this page claimed
    async fn handle_page(
        &self,
        ctx: &SessionContext,
        entry: FrontierEntry,
    ) -> (PageReport, Vec<FrontierEntry>) {
        info!(url = %entry.url, depth = entry.depth, "processing page");

        let (outcome, discovered) = match self.process_page(ctx, &entry).await {
            Ok((path, discovered)) => (
                PageOutcome::Saved {
                    path,
                    links_enqueued: discovered.len(),
                },
                discovered,
            ),
            Err(e) => {
                warn!(url = %entry.url, error = %e, "error processing page");
                (
                    PageOutcome::Failed {
                        error: e.to_string(),
                    },
                    Vec::new(),
                )
            }
        };

        let report = PageReport {
            url: entry.url.to_string(),
            depth: entry.depth,
            outcome,
        };
        (report, discovered)
    }

    async fn process_page(
        &self,
        ctx: &SessionContext,
        entry: &FrontierEntry,
    ) -> Result<(PathBuf, Vec<FrontierEntry>), PageError> {
        // The only suspension point: waits until the page is idle
        let page = self.renderer.render(&entry.url).await?;
        ctx.record_loaded(entry, &page);
        // A redirect target is the same page; don't fetch it again
        ctx.visited.try_mark_visited(page.loaded_url());

        // Noise is removed from `dom` in place
        let mut dom = page.dom();
        let body = extract_markdown(&mut dom);
        let path = ctx
            .writer
            .write(ExtractedDocument::new(entry.url.clone(), body))?;

        let mut discovered = Vec::new();
        let next_depth = entry.depth + 1;
        if ctx.session.mode().discovers_links() && ctx.within_depth(next_depth) {
            for link in page.discover_links(&dom) {
                if !ctx.in_scope(&link) {
                    debug!(url = %link, "link outside crawl scope");
                    continue;
                }
                if ctx.visited.try_mark_visited(&link) {
                    discovered.push(FrontierEntry {
                        url: link,
                        depth: next_depth,
                    });
                }
            }
        }

        Ok((path, discovered))
    }
}

fn transition(state: &mut SessionState, next: SessionState, ctx: &SessionContext) {
    debug!(
        from = %state,
        to = %next,
        mode = ?ctx.session.mode(),
        domain = ctx.session.domain_key(),
        "session state"
    );
    *state = next;
}
