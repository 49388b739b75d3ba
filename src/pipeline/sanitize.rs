//! DOM sanitisation: drop comments and non-content subtrees.
//!
//! Runs exactly once, after parsing and before the block walk. Removing the
//! subtrees up front (rather than skipping them during traversal) keeps the
//! extractor's dispatch rules free of "unless inside a script" conditions —
//! by the time the walker runs, those nodes simply do not exist.

use ego_tree::NodeId;
use scraper::node::Node;
use scraper::Html;

/// Tags whose entire subtree is removed: executable or non-rendered content
/// (`script`, `style`, `noscript`), embedded documents (`iframe`), and
/// vector-graphics containers (`svg`) whose text children are not prose.
const STRIP_TAGS: [&str; 5] = ["script", "style", "noscript", "iframe", "svg"];

/// Remove all comment nodes and all [`STRIP_TAGS`] subtrees in place.
pub fn sanitize(html: &mut Html) {
    // Two passes: ids are collected first because detaching invalidates the
    // descendants iterator. Detaching a node that sits inside an already
    // detached subtree is a harmless no-op, so no ancestor bookkeeping is
    // needed.
    let doomed: Vec<NodeId> = html
        .tree
        .root()
        .descendants()
        .filter(|node| match node.value() {
            Node::Comment(_) => true,
            Node::Element(el) => STRIP_TAGS.contains(&el.name()),
            _ => false,
        })
        .map(|node| node.id())
        .collect();

    for id in doomed {
        if let Some(mut node) = html.tree.get_mut(id) {
            node.detach();
        }
    }
}
