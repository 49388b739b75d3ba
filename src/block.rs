//! The semantic block model.
//!
//! A [`Block`] is one atomic unit of the extracted document: a heading, a
//! list item, an image, a run of plain text, and so on. Extraction produces
//! an ordered `Vec<Block>` in document order; that order is the contract the
//! renderer relies on, so blocks carry no parent/child links — nesting that
//! the extractor chooses not to preserve is flattened into the block's text.
//!
//! The serde representation is internally tagged (`{"type": "heading", ...}`)
//! so the block list can be handed to downstream consumers as JSON alongside
//! the rendered Markdown.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One semantic unit of the extracted document.
///
/// Variants map one-to-one onto the extractor's dispatch rules. `href` and
/// `src` fields always hold absolute URLs, resolved against the document's
/// base URL at extraction time. Only `Image::alt` is ever updated after
/// extraction (by the annotation stage, which produces a new block list
/// rather than mutating in place).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// `h1`–`h6`. `level` is 1–6.
    Heading { level: u8, text: String },
    /// One item of a `ul`/`ol`; the container itself emits no block.
    ListItem { ordered: bool, text: String },
    /// Row 0 is treated as the header row by the renderer.
    Table { rows: Vec<Vec<String>> },
    /// `hr`.
    #[serde(rename = "hr")]
    HorizontalRule,
    Blockquote { text: String },
    /// `pre` contents, verbatim — whitespace is significant, never trimmed.
    CodeBlock { code: String },
    /// A `code` element with no element children.
    InlineCode { text: String },
    Emphasis { style: EmphasisStyle, text: String },
    Link { href: String, text: String },
    Image { src: String, alt: String },
    /// `video`/`audio` with a `src` attribute.
    Media { tag: MediaTag, src: String },
    /// Plain text; `tag` names the source element (`p`, `span`, `input`, …).
    Text { tag: String, text: String },
}

/// Emphasis flavour: `strong`/`b` vs `em`/`i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisStyle {
    Bold,
    Italic,
}

/// Which media element produced a [`Block::Media`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaTag {
    Video,
    Audio,
}

impl fmt::Display for MediaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaTag::Video => f.write_str("video"),
            MediaTag::Audio => f.write_str("audio"),
        }
    }
}

impl Block {
    /// The image source URL, if this is an [`Block::Image`].
    pub fn image_src(&self) -> Option<&str> {
        match self {
            Block::Image { src, .. } => Some(src),
            _ => None,
        }
    }
}
