// src/crawl/frontier.rs
// =============================================================================
// This module holds the crawl frontier and the visited-URL tracker.
//
// How it works:
// 1. Every URL is normalized before anyone looks at it (fragment dropped)
// 2. The visited set answers "is this new?" and records it in one step
// 3. Only URLs that won that check are ever pushed onto the frontier queue
// 4. The controller pops URLs off the front (breadth-first)
//
// It also derives the names used on disk: the domain key (folder and
// manifest name) and the sanitized path (markdown file name).
//
// Rust concepts:
// - Mutex<HashSet>: Several pages in flight may check the same link at once
// - VecDeque: Double-ended queue for breadth-first crawling
// =============================================================================

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use url::Url;

/// A URL waiting to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    /// Link hops from the seed this URL was reached through (seeds are 0)
    pub depth: usize,
}

impl FrontierEntry {
    pub fn seed(url: Url) -> Self {
        Self { url, depth: 0 }
    }
}

/// Pending URLs in breadth-first order.
#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.pending.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Every URL processed or queued in this session.
///
/// Only ever grows. `try_mark_visited` is the one place where two pages
/// rendering at the same time can race on the same link, so the check and
/// the insert happen under a single lock.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` and returns true, unless it was already recorded.
    pub fn try_mark_visited(&self, url: &Url) -> bool {
        let key = normalize_url(url.clone());
        self.lock().insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // A panic while holding the lock cannot leave a HashSet half-inserted,
    // so a poisoned lock is still safe to use
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The canonical form used for dedup: same URL, fragment removed.
///
/// The url crate already lowercases the scheme and host and adds the
/// root path, so `HTTPS://Example.com` and `https://example.com/#top`
/// end up identical.
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

// Cleans a URL's host into a folder-friendly key
//
// Example:
//   "https://www.docs.example.com/page" -> "docsexamplecom"
//
// A URL without a host gives an empty key; sessions reject those up front.
pub fn normalize_domain(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.replace('.', "")
}

// Turns a URL's path and query into a file name
//
// Only letters, digits, '-' and '_' survive. The site root (or any path
// made only of punctuation) becomes "index".
//
// Examples:
//   "https://example.com/docs/getting-started" -> "docsgetting-started"
//   "https://example.com/search?q=rust_lang"   -> "searchqrust_lang"
//   "https://example.com/"                     -> "index"
pub fn sanitize_path(url: &Url) -> String {
    let raw = format!("{}{}", url.path(), url.query().unwrap_or_default());

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let cleaned = cleaned.trim_end();

    if cleaned.is_empty() {
        "index".to_string()
    } else {
        cleaned.to_string()
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why mark URLs when they are queued instead of when they are fetched?
//    - A link found on ten pages would otherwise sit in the queue ten times
//    - Marking at discovery means the queue never holds duplicates
//    - The set's size is "pages done + pages waiting"
//
// 2. Why can two URLs share a file name?
//    - "/docs/intro" and "/docsintro" both sanitize to "docsintro"
//    - The later page simply overwrites the earlier one; this is accepted
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_normalize_domain_strips_www_and_dots() {
        assert_eq!(normalize_domain(&url("https://www.example.com/x")), "examplecom");
        assert_eq!(
            normalize_domain(&url("https://docs.rs.example.org")),
            "docsrsexampleorg"
        );
    }

    #[test]
    fn test_normalize_domain_only_strips_leading_www() {
        assert_eq!(
            normalize_domain(&url("https://shop.www.example.com")),
            "shopwwwexamplecom"
        );
    }

    #[test]
    fn test_normalize_domain_ignores_port() {
        assert_eq!(normalize_domain(&url("http://localhost:8080/")), "localhost");
    }

    #[test]
    fn test_sanitize_path_keeps_safe_chars() {
        assert_eq!(
            sanitize_path(&url("https://example.com/docs/getting-started")),
            "docsgetting-started"
        );
        assert_eq!(
            sanitize_path(&url("https://example.com/search?q=rust_lang&page=2")),
            "searchqrust_langpage2"
        );
    }

    #[test]
    fn test_sanitize_path_root_is_index() {
        assert_eq!(sanitize_path(&url("https://example.com")), "index");
        assert_eq!(sanitize_path(&url("https://example.com/")), "index");
        assert_eq!(sanitize_path(&url("https://example.com/./?&=")), "index");
    }

    #[test]
    fn test_sanitize_path_ignores_fragment() {
        assert_eq!(sanitize_path(&url("https://example.com/a#b")), "a");
    }

    #[test]
    fn test_sanitize_path_output_is_filename_safe() {
        let samples = [
            "https://example.com/a b/c%20d",
            "https://example.com/ümlaut/ß?x=<y>",
            "https://example.com/..%2F..%2Fetc/passwd",
            "https://example.com/;params;x=1?q=\"quoted\"",
        ];
        for sample in samples {
            let name = sanitize_path(&url(sample));
            assert!(!name.is_empty());
            assert!(name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_normalize_url_drops_fragment() {
        let normalized = normalize_url(url("HTTPS://Example.com#top"));
        assert_eq!(normalized.as_str(), "https://example.com/");
    }

    #[test]
    fn test_try_mark_visited_only_once() {
        let visited = VisitedSet::new();
        assert!(visited.try_mark_visited(&url("https://example.com/a")));
        assert!(!visited.try_mark_visited(&url("https://example.com/a")));
        assert!(!visited.try_mark_visited(&url("https://example.com/a#section")));
        assert!(visited.try_mark_visited(&url("https://example.com/b")));
        assert!(!visited.try_mark_visited(&url("https://example.com/b#x")));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_try_mark_visited_concurrent_single_winner() {
        let visited = Arc::new(VisitedSet::new());
        let target = url("https://example.com/contested");

        let wins: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let visited = Arc::clone(&visited);
                    let target = target.clone();
                    scope.spawn(move || visited.try_mark_visited(&target))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|won| *won)
                .count()
        });

        assert_eq!(wins, 1);
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_frontier_is_fifo() {
        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::seed(url("https://example.com/1")));
        frontier.push(FrontierEntry {
            url: url("https://example.com/2"),
            depth: 1,
        });
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pop().unwrap().url.path(), "/1");
        assert_eq!(frontier.pop().unwrap().depth, 1);
        assert!(frontier.is_empty());
    }
}
