//! Configuration types for HTML-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across tasks and to see at a glance why two
//! runs produced different output.
//!
//! # Design choice: builder over constructor
//! A constructor with this many fields is unreadable and breaks on every new
//! field. The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::describe::ImageDescriber;
use crate::error::Web2MdError;
use std::fmt;
use std::sync::Arc;

/// Configuration for an HTML-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use web2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .concurrency(20)
///     .model("gpt-4.1-nano")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Whether to run the image-annotation stage at all. Default: true.
    ///
    /// Extraction and rendering are pure and offline; annotation is the only
    /// stage that performs network I/O. Disabling it turns the whole pipeline
    /// into a deterministic, dependency-free transformation — useful in tests
    /// and in batch jobs that enrich images in a later pass.
    pub annotate_images: bool,

    /// Number of concurrent describe calls. Default: 50.
    ///
    /// Description calls are network-bound, not CPU-bound, and the typical
    /// page carries tens of distinct images, so a wide pool keeps the join
    /// barrier short. Lower this if the API starts returning 429s.
    pub concurrency: usize,

    /// Per-describe-call timeout in seconds. Default: 30.
    ///
    /// The annotator waits for the full batch before merging, so one hung
    /// request would otherwise stall the whole document. A timed-out URL gets
    /// an inline error marker as its description, like any other failure.
    pub describe_timeout_secs: u64,

    /// Vision model identifier. If None, uses the describer's default.
    pub model: Option<String>,

    /// Custom description prompt. If None, uses
    /// [`crate::prompts::DEFAULT_IMAGE_PROMPT`].
    pub image_prompt: Option<String>,

    /// Pre-constructed describer. Takes precedence over environment-based
    /// resolution — inject a mock here in tests, or a caching wrapper in
    /// production.
    pub describer: Option<Arc<dyn ImageDescriber>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            annotate_images: true,
            concurrency: 50,
            describe_timeout_secs: 30,
            model: None,
            image_prompt: None,
            describer: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("annotate_images", &self.annotate_images)
            .field("concurrency", &self.concurrency)
            .field("describe_timeout_secs", &self.describe_timeout_secs)
            .field("model", &self.model)
            .field("image_prompt", &self.image_prompt)
            .field(
                "describer",
                &self.describer.as_ref().map(|_| "<dyn ImageDescriber>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn annotate_images(mut self, v: bool) -> Self {
        self.config.annotate_images = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn describe_timeout_secs(mut self, secs: u64) -> Self {
        self.config.describe_timeout_secs = secs.max(1);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn image_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.image_prompt = Some(prompt.into());
        self
    }

    pub fn describer(mut self, describer: Arc<dyn ImageDescriber>) -> Self {
        self.config.describer = Some(describer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Web2MdError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(Web2MdError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        if c.describe_timeout_secs == 0 {
            return Err(Web2MdError::InvalidConfig(
                "Describe timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
