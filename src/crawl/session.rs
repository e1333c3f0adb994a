// src/crawl/session.rs
// =============================================================================
// This module defines what one invocation crawls.
//
// A CrawlSession is built once from the seeds and the mode, validated up
// front, and never changes afterwards. Anything wrong with the seeds is a
// session-level error: it is reported before a single page is fetched.
// =============================================================================

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::frontier::{normalize_domain, normalize_url};

/// Errors that stop a session before any page is processed.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("seed URL must be http or https: {0}")]
    UnsupportedScheme(String),

    #[error("seed URL has no host: {0}")]
    MissingHost(String),

    #[error("seed list is empty")]
    EmptySeedList,

    #[error("recursive and single-page crawls take exactly one seed, got {0}")]
    SeedCount(usize),

    #[error("could not read seed manifest {}: {source}", path.display())]
    SeedManifest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlMode {
    /// Follow links from one seed until nothing new is found
    Recursive,
    /// Just the seed page
    SinglePage,
    /// A fixed list of pages, no link following
    Batch,
}

impl CrawlMode {
    pub fn discovers_links(self) -> bool {
        matches!(self, CrawlMode::Recursive)
    }
}

/// Lifecycle of a session: Idle -> Running -> Completed | Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The seeds, the mode and the output key for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlSession {
    seeds: Vec<Url>,
    mode: CrawlMode,
    domain_key: String,
}

impl CrawlSession {
    /// Crawl everything reachable from `seed`.
    pub fn recursive(seed: &str) -> Result<Self, SessionError> {
        Self::new(CrawlMode::Recursive, vec![parse_seed(seed)?])
    }

    /// Fetch only `seed`.
    pub fn single_page(seed: &str) -> Result<Self, SessionError> {
        Self::new(CrawlMode::SinglePage, vec![parse_seed(seed)?])
    }

    /// Fetch each of `seeds`, in order. Output is grouped under the first
    /// seed's domain, whatever the others are.
    pub fn batch<S: AsRef<str>>(seeds: &[S]) -> Result<Self, SessionError> {
        let seeds = seeds
            .iter()
            .map(|seed| parse_seed(seed.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(CrawlMode::Batch, seeds)
    }

    fn new(mode: CrawlMode, seeds: Vec<Url>) -> Result<Self, SessionError> {
        let first = seeds.first().ok_or(SessionError::EmptySeedList)?;

        if mode != CrawlMode::Batch && seeds.len() != 1 {
            return Err(SessionError::SeedCount(seeds.len()));
        }

        let domain_key = normalize_domain(first);
        Ok(Self {
            seeds,
            mode,
            domain_key,
        })
    }

    pub fn seeds(&self) -> &[Url] {
        &self.seeds
    }

    /// The first seed; link policies and output names are relative to it.
    pub fn primary_seed(&self) -> &Url {
        // `new` refuses empty seed lists
        &self.seeds[0]
    }

    pub fn mode(&self) -> CrawlMode {
        self.mode
    }

    pub fn domain_key(&self) -> &str {
        &self.domain_key
    }
}

// Parses and validates one seed URL
//
// The seed must be an absolute http(s) URL with a host; the fragment is
// dropped so the seed dedups the same way discovered links do.
pub fn parse_seed(raw: &str) -> Result<Url, SessionError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|source| SessionError::InvalidSeed {
        url: raw.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(SessionError::UnsupportedScheme(raw.to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(SessionError::MissingHost(raw.to_string()));
    }

    Ok(normalize_url(url))
}
