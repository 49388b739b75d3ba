//! # web2md
//!
//! Convert captured HTML pages to semantic blocks and Markdown, optionally
//! enriching images with Vision Language Model (VLM) descriptions.
//!
//! ## Why this crate?
//!
//! Generic HTML-to-Markdown converters try to reproduce arbitrary nesting
//! and usually produce noisy output from real-world pages. This crate takes
//! the opposite stance: a page is decomposed into a *flat, ordered list of
//! typed blocks* — headings, list items, tables, images, links, text runs —
//! and each block renders to one predictable piece of Markdown. The flat
//! shape is easy to post-process, diff, and feed to an LLM, and the block
//! list itself is part of the public output, not just an implementation
//! detail.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML + base URL
//!  │
//!  ├─ 1. Normalize  rewrite <br> tags to spaces before parsing
//!  ├─ 2. Sanitize   drop comments, script/style/noscript/iframe/svg
//!  ├─ 3. Extract    depth-first walk → ordered Vec<Block>
//!  ├─ 4. Annotate   concurrent VLM descriptions per distinct image URL
//!  └─ 5. Render     deterministic one-pass Markdown serialisation
//! ```
//!
//! Steps 1–3 and 5 are synchronous and deterministic; step 4 is the only
//! concurrent stage and can be disabled entirely.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use web2md::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let html = std::fs::read_to_string("page.html")?;
//!     // Describer auto-detected from OPENAI_API_KEY
//!     let config = ConversionConfig::default();
//!     let output = convert(&html, "https://example.com/page", &config).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("{} blocks, {} images described",
//!         output.stats.block_count,
//!         output.stats.described_images);
//!     Ok(())
//! }
//! ```
//!
//! Extraction alone, no network:
//!
//! ```rust
//! use web2md::{extract_blocks, render_markdown};
//!
//! let blocks = extract_blocks("<h1>Title</h1>", "https://example.com")?;
//! assert_eq!(render_markdown(&blocks), "# Title");
//! # Ok::<(), web2md::Web2MdError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `web2md` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! web2md = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod block;
pub mod config;
pub mod convert;
pub mod describe;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use block::{Block, EmphasisStyle, MediaTag};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync, convert_to_file, extract_blocks, render_markdown};
pub use describe::{DescribeError, ImageDescriber, OpenAiDescriber};
pub use error::Web2MdError;
pub use output::{ConversionOutput, ConversionStats};
