//! Error types for the web2md library.
//!
//! Only *fatal* conditions live here: a base URL that cannot be parsed, an
//! extractor that blew up, a missing describer. Per-image description
//! failures are deliberately not errors at this level — the annotation stage
//! isolates them per URL and substitutes an inline `Error: …` marker string
//! as that image's description, so one unreachable image never sinks the
//! document. Callers that care can grep the alt text; callers that don't get
//! a complete Markdown document either way.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the web2md library.
#[derive(Debug, Error)]
pub enum Web2MdError {
    /// The supplied base URL is not an absolute URL.
    #[error("Invalid base URL '{url}': {source}\nThe base URL must be absolute, e.g. https://example.com/page")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The DOM walk failed in an unexpected way.
    ///
    /// The parser itself is permissive and tolerates arbitrarily malformed
    /// HTML, so this surfaces only genuine internal failures. Callers are
    /// expected to fall back to presenting the raw HTML.
    #[error("Block extraction failed: {detail}")]
    ExtractionFailed { detail: String },

    /// Annotation was requested but no describer could be resolved.
    #[error("No image describer is configured.\n{hint}")]
    DescriberNotConfigured { hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
