// src/crawl/mod.rs
// =============================================================================
// This module handles crawl sessions.
//
// Features:
// - Three modes: recursive crawl, single page, batch from a URL list
// - Breadth-first traversal with a concurrency-safe visited set
// - Explicit link policy (same host by default)
// - Per-page failure isolation: one bad page never stops the session
//
// Submodules:
// - frontier: Pending URLs, the visited set, and on-disk naming
// - policy: Which discovered links get followed
// - session: Seeds, mode and session-level errors
// - seeds: Loading batch seeds from a CSV manifest
// - controller: The crawl loop tying renderer, extractor and writer together
// =============================================================================

mod controller;
mod frontier;
mod policy;
mod seeds;
mod session;

pub use controller::{CrawlReport, Crawler, PageOutcome};
pub use frontier::{normalize_url, sanitize_path};
pub use policy::LinkPolicy;
pub use seeds::load_seed_manifest;
pub use session::{CrawlSession, SessionError, SessionState};
