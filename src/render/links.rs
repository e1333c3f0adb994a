// src/render/links.rs
// =============================================================================
// This module discovers the outbound links of a rendered page.
//
// We use the `scraper` crate to find every <a href> still attached to the
// document and the `url` crate to resolve each href against the page URL. What comes out is already
// normalized (see crawl::frontier::normalize_url), so the crawler can feed
// it straight into the visited set.
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::crawl::normalize_url;

// Selector::parse only fails on invalid CSS; this one is a constant
static ANCHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

// Extracts all crawlable links from a parsed document
//
// Parameters:
//   document: the page's DOM (nodes detached from it are not searched)
//   base: the URL the HTML was served from (for resolving relative links)
//
// Returns: normalized absolute http(s) URLs, in document order, duplicates kept
//
// Example:
//   html = "<a href='/docs#intro'>Docs</a>"
//   base = "https://example.com/page"
//   result = ["https://example.com/docs"]
pub fn extract_links(document: &Html, base: &Url) -> Vec<Url> {
    // Html::select walks every node ever parsed; walking from the root
    // element only sees what is still in the tree
    document
        .root_element()
        .select(&ANCHORS)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(base, href))
        .collect()
}

// Resolves a link (possibly relative) to a normalized absolute URL
//
// Anchors and special protocols are skipped: a fragment-only link points
// back at the same page, and mailto:, tel:, javascript:, data: and friends
// are not pages at all.
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    Some(normalize_url(url))
}
