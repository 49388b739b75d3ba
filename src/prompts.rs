//! Prompts sent to the vision-description capability.
//!
//! Centralising prompts in one module keeps them out of the annotation
//! logic, so changing the wording never touches concurrency or merge code,
//! and unit tests can inspect the text without a live API.
//!
//! Callers can override the default via
//! [`crate::config::ConversionConfig::image_prompt`].

/// Default prompt used to describe each distinct image URL.
///
/// One fixed prompt is used for the whole batch — descriptions are keyed by
/// URL, and the same URL always gets the same question.
pub const DEFAULT_IMAGE_PROMPT: &str =
    "Describe the content of this image in one or two concise sentences. \
     Focus on what the image shows; do not speculate about why it is on the page.";
