// src/extract/rules.rs
// =============================================================================
// Element matching rules for noise removal and content root selection.
//
// Each rule is the Rust form of one simple CSS selector:
//   Tag("nav")              -> nav
//   Role("banner")          -> [role="banner"]
//   ClassToken("menu")      -> .menu
//   Id("menu")              -> #menu
//   ClassContains("header") -> [class*="header"]
// =============================================================================

use super::dom::{descendants, Dom};

/// One simple selector over a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Tag(&'static str),
    Role(&'static str),
    ClassToken(&'static str),
    Id(&'static str),
    ClassContains(&'static str),
}

impl Rule {
    /// Returns true if `node` is an element this rule selects.
    pub fn matches<D: Dom>(&self, dom: &D, node: D::Node) -> bool {
        if dom.tag_name(node).is_none() {
            return false;
        }

        match *self {
            Rule::Tag(tag) => dom.tag_name(node) == Some(tag),
            Rule::Role(role) => dom.attr(node, "role") == Some(role),
            Rule::ClassToken(token) => dom
                .attr(node, "class")
                .map_or(false, |class| class.split_ascii_whitespace().any(|t| t == token)),
            Rule::Id(id) => dom.attr(node, "id") == Some(id),
            Rule::ClassContains(needle) => dom
                .attr(node, "class")
                .map_or(false, |class| class.contains(needle)),
        }
    }
}

/// Page chrome that never belongs to the primary content.
pub const NOISE_RULES: &[Rule] = &[
    Rule::Tag("script"),
    Rule::Tag("style"),
    Rule::Tag("iframe"),
    Rule::Tag("header"),
    Rule::Tag("footer"),
    Rule::Role("banner"),
    Rule::Role("contentinfo"),
    Rule::Tag("nav"),
    Rule::ClassToken("header"),
    Rule::ClassToken("footer"),
    Rule::ClassToken("nav"),
    Rule::Id("header"),
    Rule::Id("footer"),
    Rule::Id("nav"),
    Rule::ClassToken("navigation"),
    Rule::Id("navigation"),
    Rule::ClassToken("menu"),
    Rule::Id("menu"),
    Rule::ClassToken("sidebar"),
    Rule::Id("sidebar"),
    Rule::ClassContains("header"),
    Rule::ClassContains("footer"),
    Rule::ClassContains("navigation"),
];

/// Candidates for the element holding the primary content.
pub const CONTENT_ROOT_RULES: &[Rule] = &[
    Rule::Tag("main"),
    Rule::Role("main"),
    Rule::Tag("article"),
    Rule::ClassToken("content"),
    Rule::Id("content"),
];

/// True if any rule in `rules` selects `node`.
pub fn matches_any<D: Dom>(rules: &[Rule], dom: &D, node: D::Node) -> bool {
    rules.iter().any(|rule| rule.matches(dom, node))
}

/// First node below `root` in document order selected by any of `rules`.
///
/// Like `querySelector` with a selector list: the earliest element in the
/// document wins, not the earliest rule in the list.
pub fn first_match<D: Dom>(rules: &[Rule], dom: &D, root: D::Node) -> Option<D::Node> {
    descendants(dom, root)
        .into_iter()
        .find(|node| matches_any(rules, dom, *node))
}
