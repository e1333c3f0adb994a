// src/extract/mod.rs
// =============================================================================
// This module turns a rendered page into simplified markdown.
//
// How it works:
// 1. Remove page chrome (scripts, navigation, headers, footers, sidebars)
// 2. Pick the element that most likely holds the main content
// 3. Walk that element and emit markdown for headings, blocks and list items
// 4. Squash runs of blank lines and trim the result
//
// Headings, blocks and list items are emitted as the plain text of their
// whole subtree. Nothing inside them is turned into markdown, so a heading
// nested in a <div> comes out as plain text. Output stays coarse but stable.
//
// Submodules:
// - dom: The DOM capability trait and its scraper-backed implementation
// - rules: Selector-like rules for noise and content root matching
// =============================================================================

mod dom;
mod rules;

pub use dom::{Dom, ScrapedDom};

use dom::descendants;
use once_cell::sync::Lazy;
use regex::Regex;
use rules::{first_match, matches_any, CONTENT_ROOT_RULES, NOISE_RULES};
use url::Url;

// Three newlines with any whitespace between them
static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("blank line pattern is valid"));

/// Markdown extracted from one page, ready to be written exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    source_url: Url,
    body: String,
}

impl ExtractedDocument {
    pub fn new(source_url: Url, body: String) -> Self {
        Self { source_url, body }
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    /// The file contents: a `# <url>` title line, a blank line, then the body.
    pub fn to_markdown(&self) -> String {
        format!("# {}\n\n{}", self.source_url, self.body)
    }
}

/// Runs the full extraction pipeline on `dom`.
///
/// Mutates the DOM (noise is removed in place) and returns the
/// post-processed markdown body without the title line.
pub fn extract_markdown<D: Dom>(dom: &mut D) -> String {
    remove_noise(dom);
    let dom = &*dom;
    let root = select_content_root(dom);

    let mut out = String::new();
    walk(dom, root, &mut out);

    collapse_blank_lines(&out)
}

/// Removes every element selected by the noise rules.
///
/// Returns how many subtrees were detached. Matches nested inside an already
/// removed subtree are not counted separately.
pub fn remove_noise<D: Dom>(dom: &mut D) -> usize {
    let mut doomed = Vec::new();
    let mut stack = vec![dom.document()];

    while let Some(node) = stack.pop() {
        if matches_any(NOISE_RULES, &*dom, node) {
            doomed.push(node);
            continue;
        }
        stack.extend(dom.children(node).into_iter().rev());
    }

    let removed = doomed.len();
    for node in doomed {
        dom.remove(node);
    }
    removed
}

/// Picks the main content element, falling back to `<body>`, then to the
/// document itself.
pub fn select_content_root<D: Dom>(dom: &D) -> D::Node {
    let document = dom.document();

    first_match(CONTENT_ROOT_RULES, dom, document)
        .or_else(|| {
            descendants(dom, document)
                .into_iter()
                .find(|node| dom.tag_name(*node) == Some("body"))
        })
        .unwrap_or(document)
}

// Structural walk. The first rule that applies wins and the first three
// never look inside their subtree.
fn walk<D: Dom>(dom: &D, node: D::Node, out: &mut String) {
    let tag = dom.tag_name(node);

    if let Some(level) = tag.and_then(heading_level) {
        out.push('\n');
        out.push_str(&"#".repeat(level));
        out.push(' ');
        out.push_str(dom.text_content(node).trim());
        out.push_str("\n\n");
        return;
    }

    if matches!(tag, Some("p" | "div" | "section" | "article")) {
        out.push('\n');
        out.push_str(dom.text_content(node).trim());
        out.push_str("\n\n");
        return;
    }

    if tag == Some("li") {
        out.push_str("* ");
        out.push_str(dom.text_content(node).trim());
        out.push('\n');
        return;
    }

    for child in dom.children(node) {
        if let Some(text) = dom.text(child) {
            out.push_str(text.trim());
            out.push(' ');
        } else if dom.tag_name(child).is_some() {
            walk(dom, child, out);
        }
        // Comments, doctypes and the like contribute nothing
    }
}

fn heading_level(tag: &str) -> Option<usize> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Replaces every run of three or more newlines (whitespace in between is
/// swallowed too) by exactly two, then trims both ends.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINES.replace_all(text, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> String {
        let mut dom = ScrapedDom::parse(html);
        extract_markdown(&mut dom)
    }

    #[test]
    fn test_heading_then_paragraph() {
        assert_eq!(
            extract("<h2>Title</h2><p>Body text</p>"),
            "## Title\n\nBody text"
        );
    }

    #[test]
    fn test_heading_inside_div_is_flattened() {
        assert_eq!(extract("<div><h2>X</h2></div>"), "X");
    }

    #[test]
    fn test_heading_text_is_flattened() {
        assert_eq!(
            extract("<h1>Hello <em>there</em> <a href='/x'>you</a></h1>"),
            "# Hello there you"
        );
    }

    #[test]
    fn test_list_items() {
        assert_eq!(
            extract("<ul><li>One</li><li> Two <b>bold</b> </li></ul>"),
            "* One\n* Two bold"
        );
    }

    #[test]
    fn test_all_heading_levels() {
        let out = extract("<h3>c</h3><h6>f</h6>");
        assert_eq!(out, "### c\n\n###### f");
    }

    #[test]
    fn test_loose_text_gets_trailing_space() {
        assert_eq!(extract("<span>one</span><span>two</span>"), "one two");
    }

    #[test]
    fn test_noise_is_removed() {
        let html = r#"
            <header>Site title</header>
            <nav>Home | About</nav>
            <p>Real content</p>
            <div class="page-footer-links">Links</div>
            <script>var x = 1;</script>
            <footer>Copyright</footer>
        "#;
        assert_eq!(extract(html), "Real content");
    }

    #[test]
    fn test_noise_by_id_and_role() {
        let html = r#"
            <div id="sidebar">Side</div>
            <section role="contentinfo">Info</section>
            <p>Body</p>
        "#;
        assert_eq!(extract(html), "Body");
    }

    #[test]
    fn test_main_is_preferred_over_body() {
        let html = "<p>Outside</p><main><h1>Inside</h1><p>Kept</p></main>";
        assert_eq!(extract(html), "# Inside\n\nKept");
    }

    #[test]
    fn test_article_root_is_flattened_as_a_block() {
        let html = "<p>Outside</p><article><h1>Title</h1><p>Text</p></article>";
        assert_eq!(extract(html), "TitleText");
    }

    #[test]
    fn test_role_main_root() {
        let html = r#"<p>Outside</p><span role="main"><h4>Deep</h4></span>"#;
        assert_eq!(extract(html), "#### Deep");
    }

    #[test]
    fn test_comments_are_ignored() {
        assert_eq!(extract("<span><!-- hidden -->shown</span>"), "shown");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract(""), "");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = "<h2>A</h2><ul><li>x</li></ul><p>b</p>";
        assert_eq!(extract(html), extract(html));
    }

    #[test]
    fn test_remove_noise_counts_outer_matches_only() {
        let mut dom = ScrapedDom::parse("<nav><div class='menu'>m</div></nav><p>x</p>");
        assert_eq!(remove_noise(&mut dom), 1);
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n \n\t\n b"), "a\n\n b");
        assert_eq!(collapse_blank_lines("  \n\na\n\nb\n\n"), "a\n\nb");
    }

    #[test]
    fn test_no_triple_newlines_survive() {
        let samples = [
            "\n\n\n\n\n\n",
            "x\n\n\ny\n \n \n \nz",
            "\n# t\n\n\n\nbody\n\n* a\n* b\n\n\n",
        ];
        for sample in samples {
            assert!(!collapse_blank_lines(sample).contains("\n\n\n"));
        }
    }

    #[test]
    fn test_to_markdown_has_title_line() {
        let url = Url::parse("https://example.com/docs").unwrap();
        let doc = ExtractedDocument::new(url, "Body".to_string());
        assert_eq!(doc.to_markdown(), "# https://example.com/docs\n\nBody");
    }
}
