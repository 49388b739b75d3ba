//! Conversion entry points.
//!
//! [`convert`] runs the whole pipeline; [`extract_blocks`] and
//! [`render_markdown`] expose the synchronous halves for callers that handle
//! annotation themselves (or skip it). The extraction half is infallible in
//! the parsing sense — the parser tolerates any input — so its error path
//! exists only to turn an unexpected internal panic into a well-defined
//! [`Web2MdError::ExtractionFailed`] the caller can fall back from.

use crate::block::Block;
use crate::config::ConversionConfig;
use crate::describe::{ImageDescriber, OpenAiDescriber};
use crate::error::Web2MdError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{annotate, extract, normalize, render, sanitize};
use scraper::Html;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Convert an HTML document to annotated blocks and Markdown.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `html` — the raw HTML document
/// * `base_url` — absolute URL the document was fetched from; relative
///   `href`/`src` attributes are resolved against it
/// * `config` — conversion configuration
///
/// # Errors
/// Returns `Err(Web2MdError)` only for fatal conditions: an unparseable base
/// URL, an internal extraction failure, or annotation requested with no
/// describer resolvable. Individual image-description failures are not
/// fatal — they surface as `Error: …` marker text in the affected alt
/// attributes.
pub async fn convert(
    html: &str,
    base_url: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Web2MdError> {
    let total_start = Instant::now();
    info!("Starting conversion of {} bytes from {}", html.len(), base_url);

    // ── Step 1: Extract blocks ───────────────────────────────────────────
    let extract_start = Instant::now();
    let blocks = extract_blocks(html, base_url)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    let block_count = blocks.len();
    let image_count = blocks.iter().filter(|b| b.image_src().is_some()).count();
    debug!(
        "Extracted {} blocks ({} images) in {}ms",
        block_count, image_count, extract_duration_ms
    );

    // ── Step 2: Annotate images ──────────────────────────────────────────
    let annotate_start = Instant::now();
    let (blocks, described_images) = if config.annotate_images && image_count > 0 {
        let describer = resolve_describer(config)?;
        let descriptions = annotate::describe_images(&blocks, &describer, config).await;
        let described = descriptions.len();
        (annotate::apply_descriptions(blocks, &descriptions), described)
    } else {
        (blocks, 0)
    };
    let annotate_duration_ms = annotate_start.elapsed().as_millis() as u64;

    // ── Step 3: Render ───────────────────────────────────────────────────
    let markdown = render::render(&blocks);

    let stats = ConversionStats {
        block_count,
        image_count,
        described_images,
        extract_duration_ms,
        annotate_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} blocks, {} images described, {}ms total",
        stats.block_count, stats.described_images, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        markdown,
        blocks,
        stats,
    })
}

/// Convert and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    html: &str,
    base_url: &str,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Web2MdError> {
    let output = convert(html, base_url, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Web2MdError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &output.markdown)
        .await
        .map_err(|e| Web2MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Web2MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    html: &str,
    base_url: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Web2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Web2MdError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(html, base_url, config))
}

/// Run the synchronous extraction half: normalise, parse, sanitise, walk.
///
/// Deterministic for identical input; performs no I/O.
pub fn extract_blocks(html: &str, base_url: &str) -> Result<Vec<Block>, Web2MdError> {
    let base = Url::parse(base_url).map_err(|source| Web2MdError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;

    // The walk has no expected failure mode, but an unexpected panic must
    // reach the caller as an error they can fall back from, not a crash.
    catch_unwind(AssertUnwindSafe(|| {
        let normalized = normalize::normalize_line_breaks(html);
        let mut doc = Html::parse_document(&normalized);
        sanitize::sanitize(&mut doc);
        extract::extract(&doc, &base)
    }))
    .map_err(|panic| Web2MdError::ExtractionFailed {
        detail: panic_message(&panic),
    })
}

/// Render a block sequence to Markdown. Pure and deterministic.
pub fn render_markdown(blocks: &[Block]) -> String {
    render::render(blocks)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the describer: a pre-built one from the config wins, otherwise
/// fall back to `OPENAI_API_KEY` from the environment.
fn resolve_describer(config: &ConversionConfig) -> Result<Arc<dyn ImageDescriber>, Web2MdError> {
    if let Some(ref describer) = config.describer {
        return Ok(Arc::clone(describer));
    }

    OpenAiDescriber::from_env(config.model.as_deref())
        .map(|d| Arc::new(d) as Arc<dyn ImageDescriber>)
        .ok_or_else(|| Web2MdError::DescriberNotConfigured {
            hint: "Set OPENAI_API_KEY, pass a describer via \
                   ConversionConfig::builder().describer(..), or disable \
                   annotation with .annotate_images(false)."
                .into(),
        })
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic during extraction".to_string()
    }
}
