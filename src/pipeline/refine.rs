//! Page refinement: one page of raw text through the external transformer.
//!
//! This stage is intentionally thin — all prompt wording lives in
//! [`crate::prompts`] so it can be changed without touching permit or
//! error-handling logic here.
//!
//! ## Permit discipline
//!
//! The permit is acquired *after* the blank-page check (a blank page costs
//! nothing and must not occupy capacity) and held as a guard value for the
//! duration of the transformer call. Its drop releases it on every exit
//! path — success, transformer error, timeout, or cancellation of the whole
//! conversion.

use crate::config::ConversionConfig;
use crate::error::SlidemarkError;
use crate::llm::TextTransformer;
use crate::output::{PageResult, RawPage};
use crate::pipeline::limit::RefineLimiter;
use crate::pipeline::postprocess;
use crate::prompts::{page_prompt, DEFAULT_PAGE_PROMPT};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Refine a single page into cleaned Markdown.
///
/// Empty or whitespace-only raw text returns an empty [`PageResult`]
/// immediately — no permit is taken and the transformer is never invoked.
///
/// # Errors
/// * [`SlidemarkError::TransformFailed`] — the transformer call failed;
///   the error names the 1-based page number. Not converted to an empty
///   page: the caller's abort-all policy depends on seeing it.
/// * [`SlidemarkError::TransformTimeout`] — the call outlived
///   [`ConversionConfig::transform_timeout_secs`].
pub async fn refine_page(
    transformer: &Arc<dyn TextTransformer>,
    limiter: &RefineLimiter,
    page: &RawPage,
    config: &ConversionConfig,
) -> Result<PageResult, SlidemarkError> {
    if page.text.trim().is_empty() {
        debug!("page {}: blank, skipping transformer", page.index + 1);
        return Ok(PageResult {
            index: page.index,
            markdown: String::new(),
            blank: true,
            duration_ms: 0,
        });
    }

    let page_num = page.index + 1;
    let template = config.page_prompt.as_deref().unwrap_or(DEFAULT_PAGE_PROMPT);
    let prompt = page_prompt(template, page_num, &page.text);

    let _permit = limiter.acquire().await?;
    let start = Instant::now();

    let call = transformer.transform(&prompt);
    let raw = match timeout(Duration::from_secs(config.transform_timeout_secs), call).await {
        Ok(Ok(markdown)) => markdown,
        Ok(Err(source)) => {
            return Err(SlidemarkError::TransformFailed {
                page: page_num,
                source,
            })
        }
        Err(_elapsed) => {
            return Err(SlidemarkError::TransformTimeout {
                page: page_num,
                secs: config.transform_timeout_secs,
            })
        }
    };

    let duration = start.elapsed();
    let markdown = postprocess::clean_page(&raw);
    debug!(
        "page {}: refined {} chars in {:?}",
        page_num,
        markdown.len(),
        duration
    );

    Ok(PageResult {
        index: page.index,
        markdown,
        blank: false,
        duration_ms: duration.as_millis() as u64,
    })
}
