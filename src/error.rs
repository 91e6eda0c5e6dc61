//! Error types for the slidemark library.
//!
//! Three distinct error types reflect three distinct failure domains:
//!
//! * [`SlidemarkError`] — conversion failures. Under the abort-all policy a
//!   single page's transformer failure fails the whole conversion, so page
//!   failures surface here too, tagged with their 1-based page number.
//!
//! * [`TransformError`] — what went wrong inside one call to the external
//!   text-transformation service. Wrapped into
//!   [`SlidemarkError::TransformFailed`] by the refiner so callers see which
//!   page was affected.
//!
//! * [`StoreError`] — document-store failures (SQLite, filesystem, missing
//!   record). Kept separate because storage happens after conversion and a
//!   caller may want to retry persistence without re-converting.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the conversion pipeline.
#[derive(Debug, Error)]
pub enum SlidemarkError {
    /// The byte stream is not a readable PDF (corrupt header, unsupported
    /// encryption, truncated xref). Fatal — there is no partial result.
    #[error("failed to parse PDF: {detail}")]
    ParseError { detail: String },

    /// The external transformer call for one page failed. Under the
    /// abort-all policy this aborts the whole conversion.
    #[error("transformer failed on page {page}: {source}")]
    TransformFailed {
        page: usize,
        #[source]
        source: TransformError,
    },

    /// The transformer call for one page exceeded the configured deadline.
    #[error("transformer timed out after {secs}s on page {page}")]
    TransformTimeout { page: usize, secs: u64 },

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error (task join failure and the like).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A single failed call to the external text-transformation service.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The service answered with a non-success HTTP status.
    #[error("transformer returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    /// The request never completed (connection refused, DNS, TLS).
    #[error("transformer request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered 2xx but the body was not the expected shape.
    #[error("unexpected transformer response: {0}")]
    InvalidResponse(String),
}

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given identifier.
    #[error("no document with id '{id}'")]
    NotFound { id: String },

    /// SQLite layer failure.
    #[error("document store query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Reading or writing a Markdown file under the data directory failed.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_failed_display_names_page() {
        let e = SlidemarkError::TransformFailed {
            page: 3,
            source: TransformError::Http {
                status: 503,
                detail: "overloaded".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("503"), "got: {msg}");
    }

    #[test]
    fn timeout_display() {
        let e = SlidemarkError::TransformTimeout { page: 2, secs: 60 };
        assert!(e.to_string().contains("60s"));
        assert!(e.to_string().contains("page 2"));
    }

    #[test]
    fn store_not_found_display() {
        let e = StoreError::NotFound { id: "abc123".into() };
        assert!(e.to_string().contains("abc123"));
    }
}
