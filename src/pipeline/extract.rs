//! Block extraction: the depth-first DOM walk.
//!
//! This is the heart of the crate. Starting at `<body>`, every node is run
//! through an ordered list of dispatch rules; the first matching rule emits
//! its block(s) and stops the descent, and a node matching no rule recurses
//! into its children in document order. The rule order is load-bearing —
//! e.g. an `<a>` containing an `<img>` must be handled by the anchor rule
//! (which emits the image *and* the link) before the image rule could see it.
//!
//! Capturing rules (headings, list items, tables, blockquotes) flatten all
//! descendant text into a single string and emit nothing for nested
//! block-level children. That flattening is an intentional part of the
//! output contract: downstream consumers rely on e.g. a list item being one
//! line of text, so do not "fix" it into recursive block emission.
//!
//! Text flattening trims each text fragment and concatenates the non-empty
//! ones with no separator. Fragments separated only by a `<br>` keep their
//! spacing because the normaliser rewrote the tag to a space before parsing.

use crate::block::{Block, EmphasisStyle, MediaTag};
use ego_tree::NodeRef;
use scraper::node::{Element, Node};
use scraper::{ElementRef, Html};
use url::Url;

/// Walk the document body and return the blocks in traversal order.
///
/// The document is expected to be sanitised already; this function never
/// inspects comments or script/style content.
pub fn extract(doc: &Html, base: &Url) -> Vec<Block> {
    let mut blocks = Vec::new();
    if let Some(body) = find_body(doc) {
        walk(*body, base, &mut blocks);
    }
    blocks
}

fn find_body(doc: &Html) -> Option<ElementRef<'_>> {
    doc.root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
}

fn walk(node: NodeRef<'_, Node>, base: &Url, out: &mut Vec<Block>) {
    match node.value() {
        Node::Element(el) => walk_element(node, el, base, out),
        Node::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return;
            }
            // Stray text directly under the document scaffolding is noise,
            // not content.
            let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
                return;
            };
            let tag = parent.value().name();
            if matches!(tag, "html" | "head" | "body") {
                return;
            }
            out.push(Block::Text {
                tag: tag.to_string(),
                text: trimmed.to_string(),
            });
        }
        _ => {
            for child in node.children() {
                walk(child, base, out);
            }
        }
    }
}

/// Apply the dispatch rules to one element. First match wins; the wildcard
/// arm recurses into children.
fn walk_element(node: NodeRef<'_, Node>, el: &Element, base: &Url, out: &mut Vec<Block>) {
    let name = el.name();
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name.as_bytes()[1] - b'0';
            let text = flattened_text(node);
            if !text.is_empty() {
                out.push(Block::Heading { level, text });
            }
        }

        // Only *direct* item children; a list nested inside an item collapses
        // into that item's text.
        "ul" | "ol" => {
            let ordered = name == "ol";
            for li in child_elements(node, &["li"]) {
                out.push(Block::ListItem {
                    ordered,
                    text: flattened_text(*li),
                });
            }
        }

        "table" => out.push(Block::Table {
            rows: table_rows(node),
        }),

        "hr" => out.push(Block::HorizontalRule),

        "blockquote" => out.push(Block::Blockquote {
            text: flattened_text(node),
        }),

        // Whitespace-significant: the only rule that does not trim.
        "pre" => out.push(Block::CodeBlock {
            code: raw_text(node),
        }),

        // Leaf only — a code element wrapping markup falls through to
        // generic recursion so its children are dispatched individually.
        "code" if !has_element_children(node) => {
            out.push(Block::InlineCode {
                text: flattened_text(node),
            });
        }

        "strong" | "b" => out.push(Block::Emphasis {
            style: EmphasisStyle::Bold,
            text: flattened_text(node),
        }),
        "em" | "i" => out.push(Block::Emphasis {
            style: EmphasisStyle::Italic,
            text: flattened_text(node),
        }),

        "a" => {
            let Some(href) = el.attr("href") else {
                return recurse(node, base, out);
            };
            // Images first, then the link's own text: approximates reading
            // order for the common thumbnail-plus-caption anchor.
            for img in descendant_elements(node, "img") {
                if let Some(src) = img.value().attr("src") {
                    out.push(Block::Image {
                        src: resolve(base, src),
                        alt: img.value().attr("alt").unwrap_or("").to_string(),
                    });
                }
            }
            let text = flattened_text(node);
            if !text.is_empty() {
                out.push(Block::Link {
                    href: resolve(base, href),
                    text,
                });
            }
        }

        "img" => {
            let Some(src) = el.attr("src") else { return };
            if is_suppressed_mobile_variant(node, el) {
                return;
            }
            out.push(Block::Image {
                src: resolve(base, src),
                alt: el.attr("alt").unwrap_or("").to_string(),
            });
        }

        "input" => {
            if let Some(value) = el.attr("value").filter(|v| !v.is_empty()) {
                out.push(Block::Text {
                    tag: "input".to_string(),
                    text: value.to_string(),
                });
            }
        }

        "button" => out.push(Block::Text {
            tag: "button".to_string(),
            text: flattened_text(node),
        }),

        "textarea" => out.push(Block::Text {
            tag: "textarea".to_string(),
            text: flattened_text(node),
        }),

        "video" | "audio" => {
            let Some(src) = el.attr("src") else {
                return recurse(node, base, out);
            };
            let tag = if name == "video" {
                MediaTag::Video
            } else {
                MediaTag::Audio
            };
            out.push(Block::Media {
                tag,
                src: resolve(base, src),
            });
        }

        _ => recurse(node, base, out),
    }
}

fn recurse(node: NodeRef<'_, Node>, base: &Url, out: &mut Vec<Block>) {
    for child in node.children() {
        walk(child, base, out);
    }
}

// ── Responsive-image dedup ───────────────────────────────────────────────
//
// Sites that serve separate mobile/desktop variants mark them with `sp` and
// `pc` classes on sibling images. Emitting both would duplicate the picture
// in the output, so an `sp` image is suppressed whenever a `pc` image exists
// under the same parent.

fn is_suppressed_mobile_variant(node: NodeRef<'_, Node>, el: &Element) -> bool {
    if !el.classes().any(|c| c == "sp") {
        return false;
    }
    let Some(parent) = node.parent() else {
        return false;
    };
    parent
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|e| e.value().name() == "img" && e.value().classes().any(|c| c == "pc"))
}

// ── Table row collection ─────────────────────────────────────────────────

/// Rows from direct `thead`/`tbody` section children; if the table is
/// malformed enough to have none, fall back to every descendant `tr`.
fn table_rows(node: NodeRef<'_, Node>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for section in child_elements(node, &["thead", "tbody"]) {
        for tr in child_elements(*section, &["tr"]) {
            rows.push(row_cells(*tr));
        }
    }
    if rows.is_empty() {
        for tr in descendant_elements(node, "tr") {
            rows.push(row_cells(*tr));
        }
    }
    rows
}

fn row_cells(tr: NodeRef<'_, Node>) -> Vec<String> {
    child_elements(tr, &["th", "td"])
        .map(|cell| flattened_text(*cell))
        .collect()
}

// ── Node helpers ─────────────────────────────────────────────────────────

fn child_elements<'a>(
    node: NodeRef<'a, Node>,
    names: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    node.children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| names.contains(&el.value().name()))
}

fn descendant_elements<'a>(
    node: NodeRef<'a, Node>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    node.descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

fn has_element_children(node: NodeRef<'_, Node>) -> bool {
    node.children().any(|c| c.value().is_element())
}

/// Descendant text with each fragment trimmed and empties dropped, joined
/// with no separator.
fn flattened_text(node: NodeRef<'_, Node>) -> String {
    node.descendants()
        .filter_map(|n| n.value().as_text())
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Descendant text verbatim, for whitespace-significant content.
fn raw_text(node: NodeRef<'_, Node>) -> String {
    node.descendants()
        .filter_map(|n| n.value().as_text())
        .map(|t| &**t)
        .collect()
}

/// Resolve `raw` against the base URL; an unjoinable value is kept verbatim
/// rather than dropped, so the block still points at *something*.
fn resolve(base: &Url, raw: &str) -> String {
    base.join(raw)
        .map(String::from)
        .unwrap_or_else(|_| raw.to_string())
}
