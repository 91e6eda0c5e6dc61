//! Output types: per-page results, run statistics, and the final document.
//!
//! Everything here is plain serialisable data. [`ConversionOutput`] is what
//! [`crate::convert`] returns; [`Document`] is the `(title, markdown)` pair
//! handed to the [`crate::store::DocumentStore`].

use crate::title::extract_title;
use serde::{Deserialize, Serialize};

/// One page of raw extracted text, before refinement.
///
/// `text` is the empty string for pages with no extractable content — the
/// extractor never omits a page, so a vector of `RawPage` always has one
/// entry per PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// 0-based page index in document order.
    pub index: usize,
    /// Raw text as extracted, possibly empty.
    pub text: String,
}

/// Outcome of refining a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 0-based page index.
    pub index: usize,
    /// Cleaned Markdown for this page; empty means the page was blank and
    /// is omitted from the assembled document.
    pub markdown: String,
    /// True when the raw text was empty/whitespace and the transformer was
    /// never invoked.
    pub blank: bool,
    /// Wall-clock duration of the refinement call, 0 for blank pages.
    pub duration_ms: u64,
}

/// Aggregate statistics for one conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source PDF.
    pub total_pages: usize,
    /// Pages that produced non-empty Markdown.
    pub refined_pages: usize,
    /// Pages skipped as blank.
    pub blank_pages: usize,
    /// Time spent parsing and extracting text.
    pub extract_duration_ms: u64,
    /// Time spent in transformer calls (wall clock over the whole fan-out).
    pub refine_duration_ms: u64,
    /// End-to-end duration.
    pub total_duration_ms: u64,
}

/// Result of a full conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The assembled document: non-empty refined pages in page order,
    /// joined with [`crate::convert::PAGE_SEPARATOR`].
    pub markdown: String,
    /// Per-page outcomes, ascending index order.
    pub pages: Vec<PageResult>,
    /// Run statistics.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Derive the `(title, markdown)` pair for persistence.
    ///
    /// The title is the first `## ` heading of the assembled Markdown, or
    /// `fallback` when the document has none.
    pub fn into_document(self, fallback: &str) -> Document {
        let title = extract_title(&self.markdown, fallback);
        Document {
            title,
            markdown: self.markdown,
        }
    }
}

/// The unit handed to persistence: a derived title plus the full Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub markdown: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_document_uses_first_heading() {
        let out = ConversionOutput {
            markdown: "## Kinetics\n\nbody".into(),
            pages: vec![],
            stats: ConversionStats::default(),
        };
        let doc = out.into_document("lecture01");
        assert_eq!(doc.title, "Kinetics");
    }

    #[test]
    fn into_document_falls_back_without_heading() {
        let out = ConversionOutput {
            markdown: "plain text only".into(),
            pages: vec![],
            stats: ConversionStats::default(),
        };
        let doc = out.into_document("lecture01");
        assert_eq!(doc.title, "lecture01");
        assert_eq!(doc.markdown, "plain text only");
    }
}
