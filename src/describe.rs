//! The vision-description collaborator.
//!
//! The annotation stage needs exactly one capability from the outside world:
//! given an image URL and a prompt, return a natural-language description.
//! [`ImageDescriber`] captures that contract as a trait so tests can inject
//! a mock and applications can plug in any backend; [`OpenAiDescriber`] is
//! the built-in implementation, a single chat-completions call with an
//! `image_url` content part.
//!
//! A call here is single-shot: no retry, no backoff. The annotation stage
//! already tolerates per-URL failure (an erroring image becomes an inline
//! error marker, not a batch failure), so retrying would only add latency to
//! the join barrier for images that are most likely permanently broken.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Default OpenAI chat-completions endpoint.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default vision model.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Token cap per description. Descriptions are one or two sentences; 300
/// tokens is generous headroom without letting a chatty model run away.
const MAX_DESCRIPTION_TOKENS: usize = 300;

/// Errors from a single describe call.
#[derive(Debug, Error)]
pub enum DescribeError {
    /// The HTTP request itself failed (DNS, TLS, connection reset).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response parsed but contained no message content.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// An external capability that describes an image at a URL.
///
/// `describe` must be safe to call concurrently — the annotator issues up to
/// `concurrency` calls at once against a single shared instance.
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    /// Produce a natural-language description of the image at `image_url`.
    async fn describe(&self, image_url: &str, prompt: &str) -> Result<String, DescribeError>;
}

/// [`ImageDescriber`] backed by the OpenAI chat-completions API.
///
/// Images are passed by URL, not downloaded and re-uploaded: the API fetches
/// the image itself, which keeps this side of the call cheap no matter how
/// large the image is.
pub struct OpenAiDescriber {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiDescriber {
    /// Create a describer with an explicit API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: OPENAI_API_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Create a describer from `OPENAI_API_KEY`, or `None` if unset/empty.
    pub fn from_env(model: Option<&str>) -> Option<Self> {
        let key = std::env::var("OPENAI_API_KEY").ok()?;
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, model.unwrap_or(DEFAULT_MODEL)))
    }

    /// Override the endpoint URL (OpenAI-compatible proxies, tests).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[async_trait]
impl ImageDescriber for OpenAiDescriber {
    async fn describe(&self, image_url: &str, prompt: &str) -> Result<String, DescribeError> {
        let payload = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_url } }
                ]
            }],
            "max_tokens": MAX_DESCRIPTION_TOKENS,
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DescribeError::Api { status, body });
        }

        let parsed: ChatResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DescribeError::MalformedResponse("no choices in response".into()))?;

        debug!("described {} ({} chars)", image_url, content.len());
        Ok(content)
    }
}
