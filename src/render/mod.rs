// src/render/mod.rs
// =============================================================================
// This module is the boundary to whatever turns a URL into a page.
//
// The crawler never talks to the network itself. It hands a URL to a
// `Renderer` and gets back a `RenderedPage` once the page has gone quiet
// (the network-idle barrier). Extraction only starts after that.
//
// Links are discovered on the DOM the extractor already stripped, so links
// that only live in navigation, headers or footers are never followed.
//
// Submodules:
// - http: The built-in renderer (reqwest + a quiet window)
// - links: Outbound link discovery on a rendered page
//
// Rust concepts:
// - async-trait: Lets a trait declare async methods usable as `dyn Renderer`
// - Send + Sync bounds: Pages render concurrently from many futures
// =============================================================================

mod http;
mod links;

pub use http::HttpRenderer;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::extract::ScrapedDom;

/// Why a page could not be rendered.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status { status: u16 },
}

/// Fetches and renders pages.
///
/// `render` must only resolve once the page is idle: no more network
/// activity for the renderer's quiet window.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &Url) -> Result<RenderedPage, RenderError>;
}

/// A page that finished rendering. This is the DOM handle the crawler works
/// with: the parsed tree is built on demand because scraper's `Html` cannot
/// cross threads, while the page itself can.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    url: Url,
    base_url: Url,
    html: String,
}

impl RenderedPage {
    /// `base_url` is where the HTML actually came from after redirects.
    /// Relative links resolve against it.
    pub fn new(url: Url, base_url: Url, html: String) -> Self {
        Self {
            url,
            base_url,
            html,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL the page was finally loaded from.
    pub fn loaded_url(&self) -> &Url {
        &self.base_url
    }

    /// Parses the rendered HTML into a fresh, mutable DOM.
    pub fn dom(&self) -> ScrapedDom {
        ScrapedDom::parse(&self.html)
    }

    /// Every crawlable outbound link left in `dom`, normalized.
    ///
    /// `dom` is this page's DOM, usually after noise removal.
    pub fn discover_links(&self, dom: &ScrapedDom) -> Vec<Url> {
        links::extract_links(dom.html(), &self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::remove_noise;

    #[test]
    fn test_links_resolve_against_base_url() {
        let page = RenderedPage::new(
            Url::parse("https://example.com/old").unwrap(),
            Url::parse("https://example.com/new/").unwrap(),
            r#"<a href="child">Child</a>"#.to_string(),
        );
        let links = page.discover_links(&page.dom());
        assert_eq!(links[0].as_str(), "https://example.com/new/child");
        assert_eq!(page.url().as_str(), "https://example.com/old");
        assert_eq!(page.loaded_url().as_str(), "https://example.com/new/");
    }

    #[test]
    fn test_links_in_removed_noise_are_not_discovered() {
        let page = RenderedPage::new(
            Url::parse("https://example.com/").unwrap(),
            Url::parse("https://example.com/").unwrap(),
            r#"<nav><a href="/nav-only">N</a></nav>
               <div class="sidebar"><a href="/side">S</a></div>
               <main><a href="/body-link">B</a></main>"#
                .to_string(),
        );

        let mut dom = page.dom();
        assert_eq!(page.discover_links(&dom).len(), 3);

        remove_noise(&mut dom);
        let links: Vec<String> = page
            .discover_links(&dom)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(links, vec!["https://example.com/body-link"]);
    }
}
