//! The transformer abstraction.
//!
//! This trait is the seam between the pipeline and the outside world: tests
//! substitute a scripted implementation, production code plugs in one of
//! the HTTP clients from this module.

use crate::error::TransformError;
use async_trait::async_trait;

/// Default Ollama endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model used when the caller names none.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Connection settings for a transformer client.
///
/// Model name and endpoint URL are explicit constructor inputs, never
/// ambient process state.
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Base URL of the service, without a trailing slash.
    pub endpoint: String,
    /// Model identifier understood by the service.
    pub model: String,
    /// Bearer token, for services that require one. Ignored by Ollama.
    pub api_key: Option<String>,
    /// HTTP-client-level timeout in seconds. This is a transport safety
    /// net; the per-page deadline lives in
    /// [`crate::config::ConversionConfig::transform_timeout_secs`].
    pub request_timeout_secs: u64,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            request_timeout_secs: 300,
        }
    }
}

impl TransformerConfig {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}

/// A black-box text transformer: one prompt in, one Markdown string out.
///
/// Implementations must be cheap to call concurrently — the pipeline issues
/// up to `concurrency` overlapping calls against a single shared instance.
/// No batching is assumed; the refiner makes at least one call per
/// non-blank page.
#[async_trait]
pub trait TextTransformer: Send + Sync {
    /// Transform `prompt` into Markdown.
    ///
    /// The returned string is used verbatim (modulo trimming and fence
    /// cleanup) as one page of the final document.
    async fn transform(&self, prompt: &str) -> Result<String, TransformError>;
}
