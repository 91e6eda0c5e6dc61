//! Conversion entry point: the page-wise refinement orchestrator.
//!
//! ## Ordering under concurrency
//!
//! One refinement future is created per page and all of them are driven at
//! once; the permit pool, not the task count, is what bounds simultaneous
//! transformer calls. `try_join_all` returns results in *submission* order,
//! so the assembled document always follows ascending page index no matter
//! which transformer call finished first.
//!
//! ## Failure policy: abort-all
//!
//! The first page error resolves `try_join_all` with that error and drops
//! the remaining futures; dropped futures release any permits they hold.
//! The caller gets a single failure for the whole conversion and no partial
//! document is ever produced. This is deliberate — a slide deck with a
//! silently missing page reads as complete and is worse than an error.

use crate::config::ConversionConfig;
use crate::error::SlidemarkError;
use crate::llm::TextTransformer;
use crate::output::{ConversionOutput, ConversionStats, PageResult};
use crate::pipeline::{extract, limit::RefineLimiter, refine};
use futures::future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Separator between refined pages in the assembled document.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Convert PDF bytes to a Markdown document.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `pdf_bytes`   — the raw PDF document
/// * `transformer` — the text-transformation service client
/// * `config`      — conversion configuration
///
/// # Errors
/// * [`SlidemarkError::ParseError`] — the bytes are not a readable PDF
/// * [`SlidemarkError::TransformFailed`] / [`SlidemarkError::TransformTimeout`]
///   — a page's transformer call failed; the whole conversion is aborted
pub async fn convert(
    pdf_bytes: &[u8],
    transformer: Arc<dyn TextTransformer>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, SlidemarkError> {
    let total_start = Instant::now();

    // ── Step 1: Extract raw text per page ────────────────────────────────
    let extract_start = Instant::now();
    let raw_pages = extract::extract_pages(pdf_bytes).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    let total_pages = raw_pages.len();
    info!(
        "extracted {} pages in {}ms",
        total_pages, extract_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Step 2: Refine all pages, permit-bounded ─────────────────────────
    let limiter = RefineLimiter::new(config.concurrency);
    let refine_start = Instant::now();

    let transformer = &transformer;
    let limiter = &limiter;
    let page_futures = raw_pages.iter().map(|page| {
        async move {
            let page_num = page.index + 1;
            if let Some(ref cb) = config.progress_callback {
                if page.text.trim().is_empty() {
                    cb.on_page_skipped(page_num, total_pages);
                } else {
                    cb.on_page_start(page_num, total_pages);
                }
            }

            let result = refine::refine_page(transformer, limiter, page, config).await;

            if let Some(ref cb) = config.progress_callback {
                match &result {
                    Ok(r) if !r.blank => {
                        cb.on_page_complete(page_num, total_pages, r.markdown.len())
                    }
                    Ok(_) => {}
                    Err(e) => cb.on_page_error(page_num, total_pages, e.to_string()),
                }
            }
            result
        }
    });

    // Joined by page index (input order), never by completion order.
    let pages: Vec<PageResult> = future::try_join_all(page_futures).await?;
    let refine_duration_ms = refine_start.elapsed().as_millis() as u64;

    // ── Step 3: Assemble the document ────────────────────────────────────
    let markdown = assemble_document(&pages);

    let refined = pages.iter().filter(|p| !p.markdown.is_empty()).count();
    let blank = pages.iter().filter(|p| p.blank).count();
    debug!(
        "assembled {} refined pages ({} blank) into {} bytes",
        refined,
        blank,
        markdown.len()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_pages, refined);
    }

    let stats = ConversionStats {
        total_pages,
        refined_pages: refined,
        blank_pages: blank,
        extract_duration_ms,
        refine_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "conversion complete: {}/{} pages refined, {}ms total",
        refined, total_pages, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        markdown,
        pages,
        stats,
    })
}

/// Join non-empty page Markdown in index order with [`PAGE_SEPARATOR`].
///
/// `pages` is already index-ordered by construction; blank and
/// empty-output pages contribute nothing, not even a separator.
fn assemble_document(pages: &[PageResult]) -> String {
    pages
        .iter()
        .filter(|p| !p.markdown.is_empty())
        .map(|p| p.markdown.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}
