//! Output types returned by the conversion entry points.

use crate::block::Block;
use serde::{Deserialize, Serialize};

/// Result of a full conversion.
///
/// Both representations are returned: the block list for consumers that want
/// structure (indexing, selective re-rendering) and the Markdown for
/// consumers that want text. The Markdown was rendered from exactly these
/// blocks — re-rendering `blocks` reproduces `markdown`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The rendered Markdown document.
    pub markdown: String,
    /// The (possibly annotated) block sequence, in document order.
    pub blocks: Vec<Block>,
    /// Timing and counting statistics.
    pub stats: ConversionStats,
}

/// Statistics about a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Total blocks extracted.
    pub block_count: usize,
    /// Image blocks extracted (before dedup by URL).
    pub image_count: usize,
    /// Distinct image URLs submitted for description. Zero when annotation
    /// was skipped.
    pub described_images: usize,
    /// Milliseconds spent in normalise + sanitise + extract.
    pub extract_duration_ms: u64,
    /// Milliseconds spent waiting on the description batch.
    pub annotate_duration_ms: u64,
    /// Wall-clock milliseconds for the whole conversion.
    pub total_duration_ms: u64,
}
