// src/extract/dom.rs
// =============================================================================
// The minimal DOM capability the extractor needs, and its implementation on
// top of the `scraper` crate.
//
// The extraction algorithm only ever asks a handful of questions about a
// node: what tag is it, what are its attributes, what text does it hold, who
// are its children. And it needs to remove nodes. Putting those behind a
// trait keeps the algorithm independent of any particular HTML engine.
//
// Rust concepts:
// - Traits with associated types: each DOM picks its own node handle type
// - Copy handles: node ids are small values, not references into the tree
// =============================================================================

use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node};

/// Read access to a tree of HTML nodes plus node removal.
///
/// Handles are plain ids, so a node removed from the tree can still be
/// passed around safely; it simply stops being reachable from the document.
pub trait Dom {
    /// A cheap, copyable handle to one node in the tree.
    type Node: Copy;

    /// The document node, parent of `<html>`.
    fn document(&self) -> Self::Node;

    /// Lowercase tag name for element nodes, `None` for everything else.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Attribute value for element nodes.
    fn attr(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Raw text for text nodes, `None` for everything else.
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Every text node below `node` (itself included), concatenated in
    /// document order. Same semantics as the browser's `textContent`.
    fn text_content(&self, node: Self::Node) -> String;

    /// Direct children in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Detach `node` and its whole subtree from the document.
    fn remove(&mut self, node: Self::Node);
}

/// A parsed HTML document backed by scraper's `Html`.
pub struct ScrapedDom {
    html: Html,
}

impl ScrapedDom {
    /// Parses a full HTML document.
    ///
    /// html5ever never fails: broken markup is repaired the way a browser
    /// would, so this always returns a document with `<html>` and `<body>`.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The underlying document, for selector queries. Removed nodes are no
    /// longer reachable from it.
    pub fn html(&self) -> &Html {
        &self.html
    }

    fn node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }
}

impl Dom for ScrapedDom {
    type Node = NodeId;

    fn document(&self) -> NodeId {
        self.html.tree.root().id()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.value().as_element().map(|el| el.name())
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.value().as_element()?.attr(name)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.value().as_text().map(|text| &**text)
    }

    fn text_content(&self, node: NodeId) -> String {
        match self.node(node) {
            Some(node) => node
                .descendants()
                .filter_map(|d| d.value().as_text())
                .map(|text| &**text)
                .collect(),
            None => String::new(),
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        match self.node(node) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => Vec::new(),
        }
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(node) {
            node.detach();
        }
    }
}

/// Collects `node` and everything below it in document (pre-)order.
pub fn descendants<D: Dom>(dom: &D, node: D::Node) -> Vec<D::Node> {
    let mut out = Vec::new();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        out.push(current);
        // Push children reversed so the first child is popped first
        stack.extend(dom.children(current).into_iter().rev());
    }

    out
}
