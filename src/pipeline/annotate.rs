//! Image annotation: concurrent description fan-out and keyed merge.
//!
//! The only concurrent stage of the pipeline. Distinct image URLs are fanned
//! out to the describer through a bounded pool (`buffer_unordered`), every
//! call is wrapped in a timeout, and the stage joins the *entire* batch
//! before merging — there is no cancellation and no retry. A failed or
//! timed-out URL contributes an `Error: …` marker string as its description
//! instead of aborting the batch.
//!
//! Completion order is irrelevant: results land in a map keyed by URL and
//! each task owns a disjoint key, so the merge is order-independent and two
//! Image blocks sharing a src receive the identical description.

use crate::block::Block;
use crate::config::ConversionConfig;
use crate::describe::ImageDescriber;
use crate::prompts::DEFAULT_IMAGE_PROMPT;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Fan out describe calls for every distinct image URL in `blocks`.
///
/// Returns the URL → description map. Blocks without images produce an empty
/// map without touching the describer.
pub async fn describe_images(
    blocks: &[Block],
    describer: &Arc<dyn ImageDescriber>,
    config: &ConversionConfig,
) -> HashMap<String, String> {
    let urls: HashSet<&str> = blocks.iter().filter_map(Block::image_src).collect();
    if urls.is_empty() {
        return HashMap::new();
    }
    debug!("describing {} distinct image(s)", urls.len());

    let prompt = config
        .image_prompt
        .as_deref()
        .unwrap_or(DEFAULT_IMAGE_PROMPT)
        .to_string();
    let timeout = Duration::from_secs(config.describe_timeout_secs);

    stream::iter(urls.into_iter().map(|url| {
        let describer = Arc::clone(describer);
        let prompt = prompt.clone();
        let url = url.to_string();
        async move {
            let description =
                match tokio::time::timeout(timeout, describer.describe(&url, &prompt)).await {
                    Ok(Ok(description)) => description,
                    Ok(Err(e)) => {
                        warn!("describe failed for {}: {}", url, e);
                        format!("Error: {e}")
                    }
                    Err(_) => {
                        warn!(
                            "describe timed out for {} after {}s",
                            url, config.describe_timeout_secs
                        );
                        format!("Error: timed out after {}s", config.describe_timeout_secs)
                    }
                };
            (url, description)
        }
    }))
    .buffer_unordered(config.concurrency)
    .collect()
    .await
}

/// Append each mapped description to its Image block's alt text.
///
/// Pure transformation: consumes the block list and returns a new one so the
/// pre-annotation list is never aliased with the annotated one. Blocks whose
/// src has no map entry pass through untouched.
pub fn apply_descriptions(blocks: Vec<Block>, descriptions: &HashMap<String, String>) -> Vec<Block> {
    blocks
        .into_iter()
        .map(|block| match block {
            Block::Image { src, alt } => {
                let alt = match descriptions.get(&src) {
                    Some(description) => format!("{alt} {description}").trim().to_string(),
                    None => alt,
                };
                Block::Image { src, alt }
            }
            other => other,
        })
        .collect()
}
