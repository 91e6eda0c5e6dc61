//! Configuration types for PDF-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across tasks and to diff two runs to understand
//! why their outputs differ.
//!
//! Transformer-side settings (endpoint URL, model name, API key) deliberately
//! live in [`crate::llm::TransformerConfig`] instead: they belong to the
//! service client that is constructed with them, not to the pipeline.

use crate::error::SlidemarkError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use slidemark::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .concurrency(5)
///     .transform_timeout_secs(90)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Maximum simultaneous in-flight transformer calls. Default: 3.
    ///
    /// Every page's refinement task is launched at once; this cap is what
    /// the permit pool actually enforces. The transformer is network-bound,
    /// so a small cap keeps a slide deck from flooding the service while
    /// still overlapping most of the per-page latency.
    pub concurrency: usize,

    /// Hard deadline per transformer call in seconds. Default: 60.
    ///
    /// Without it a single stalled call would hang the whole request
    /// indefinitely — the orchestrator waits for every page.
    pub transform_timeout_secs: u64,

    /// Custom instruction template with `{page}` / `{text}` placeholders.
    /// If None, uses [`crate::prompts::DEFAULT_PAGE_PROMPT`].
    pub page_prompt: Option<String>,

    /// Optional per-page progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            transform_timeout_secs: 60,
            page_prompt: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("concurrency", &self.concurrency)
            .field("transform_timeout_secs", &self.transform_timeout_secs)
            .field("page_prompt", &self.page_prompt.as_ref().map(|_| "<custom>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
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
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn transform_timeout_secs(mut self, secs: u64) -> Self {
        self.config.transform_timeout_secs = secs;
        self
    }

    pub fn page_prompt(mut self, template: impl Into<String>) -> Self {
        self.config.page_prompt = Some(template.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, SlidemarkError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(SlidemarkError::InvalidConfig(
                "concurrency must be ≥ 1".into(),
            ));
        }
        if c.transform_timeout_secs == 0 {
            return Err(SlidemarkError::InvalidConfig(
                "transform timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(ref template) = c.page_prompt {
            if !template.contains(crate::prompts::TEXT_PLACEHOLDER) {
                return Err(SlidemarkError::InvalidConfig(format!(
                    "page prompt must contain the {} placeholder",
                    crate::prompts::TEXT_PLACEHOLDER
                )));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use std::sync::Arc;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.concurrency, 3);
        assert_eq!(c.transform_timeout_secs, 60);
        assert!(c.page_prompt.is_none());
    }

    #[test]
    fn builder_rejects_zero_concurrency() {
        let err = ConversionConfig::builder().concurrency(0).build();
        assert!(matches!(err, Err(SlidemarkError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_prompt_without_text_placeholder() {
        let err = ConversionConfig::builder()
            .page_prompt("no placeholder at all")
            .build();
        assert!(matches!(err, Err(SlidemarkError::InvalidConfig(_))));
    }

    #[test]
    fn builder_accepts_custom_prompt_and_callback() {
        let config = ConversionConfig::builder()
            .concurrency(8)
            .page_prompt("page {page}: {text}")
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        assert_eq!(config.concurrency, 8);
        assert!(config.page_prompt.is_some());
        assert!(config.progress_callback.is_some());
    }
}
