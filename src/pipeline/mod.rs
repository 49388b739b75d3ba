//! Pipeline stages for HTML-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets the orchestration in
//! [`crate::convert`] skip stages (e.g. annotation) without touching the
//! others.
//!
//! ## Data Flow
//!
//! ```text
//! normalize ──▶ sanitize ──▶ extract ──▶ annotate ──▶ render
//! (<br> → ' ')  (strip DOM)  (blocks)    (VLM, async)  (Markdown)
//! ```
//!
//! 1. [`normalize`] — rewrite line-break tags to spaces in the raw HTML
//! 2. [`sanitize`]  — drop comments and script/style/noscript/iframe/svg
//!    subtrees from the parsed DOM
//! 3. [`extract`]   — the depth-first block walk; synchronous and
//!    deterministic, this is where all ordering guarantees are made
//! 4. [`annotate`]  — bounded concurrent describe calls per distinct image
//!    URL, joined before a keyed merge; the only stage with network I/O
//! 5. [`render`]    — one-pass serialisation of the block list to Markdown

pub mod annotate;
pub mod extract;
pub mod normalize;
pub mod render;
pub mod sanitize;
