//! Per-page text extraction from PDF bytes via lopdf.
//!
//! ## Why spawn_blocking?
//!
//! lopdf parses the whole cross-reference table and decompresses content
//! streams synchronously. `tokio::task::spawn_blocking` moves that work
//! onto the blocking thread pool so the async workers driving transformer
//! I/O never stall on a large deck.
//!
//! ## Page-count contract
//!
//! The output always has exactly one entry per PDF page, in document order.
//! A page whose text cannot be extracted (scanned image, tokenisation
//! failure) yields an empty string rather than being omitted — downstream
//! indexing relies on `output.len() == page count`.

use crate::error::SlidemarkError;
use crate::output::RawPage;
use lopdf::Document;
use tracing::{debug, warn};

/// Extract raw text for every page of the document.
///
/// # Errors
/// [`SlidemarkError::ParseError`] when the bytes are not a readable PDF
/// (corrupt structure, or encrypted without decryption support). Fatal to
/// the whole conversion — no partial result is produced.
pub async fn extract_pages(pdf_bytes: &[u8]) -> Result<Vec<RawPage>, SlidemarkError> {
    let bytes = pdf_bytes.to_vec();

    tokio::task::spawn_blocking(move || extract_pages_blocking(&bytes))
        .await
        .map_err(|e| SlidemarkError::Internal(format!("extraction task panicked: {e}")))?
}

/// Blocking implementation of page extraction.
fn extract_pages_blocking(bytes: &[u8]) -> Result<Vec<RawPage>, SlidemarkError> {
    let doc = Document::load_mem(bytes).map_err(|e| SlidemarkError::ParseError {
        detail: e.to_string(),
    })?;

    if doc.is_encrypted() {
        return Err(SlidemarkError::ParseError {
            detail: "document is encrypted".into(),
        });
    }

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();
    debug!("PDF loaded: {} pages", page_numbers.len());

    let mut pages = Vec::with_capacity(page_numbers.len());
    for (index, number) in page_numbers.iter().enumerate() {
        let text = match doc.extract_text(&[*number]) {
            Ok(t) => t,
            Err(e) => {
                warn!("page {}: no extractable text ({e})", index + 1);
                String::new()
            }
        };
        pages.push(RawPage { index, text });
    }

    Ok(pages)
}
