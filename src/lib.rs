//! # slidemark
//!
//! Convert lecture-slide PDFs to cleaned, structured Markdown using LLM
//! text refinement.
//!
//! ## Why this crate?
//!
//! Raw text extracted from slide decks is messy — fragmented lines, stray
//! bullet glyphs, page numbers, and boilerplate repeated on every slide.
//! Instead of rule-based cleanup, this crate sends each page's text through
//! a language model with a fixed editing instruction, producing per-page
//! Markdown with a proper heading, normalised lists, and the noise removed.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Extract   per-page raw text via lopdf (spawn_blocking)
//!  ├─ 2. Refine    concurrent LLM calls, bounded by a permit pool
//!  ├─ 3. Assemble  non-empty pages joined in page order by "\n\n---\n\n"
//!  ├─ 4. Title     first `## ` heading, or a filename-derived fallback
//!  └─ 5. Store     optional: SQLite record + one .md file per document
//! ```
//!
//! Blank pages cost nothing: they skip the permit pool and the transformer
//! entirely and are omitted from the assembled document. A failed
//! transformer call on any page aborts the whole conversion — no partial
//! documents.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slidemark::{convert, ConversionConfig, OllamaTransformer, TransformerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transformer = Arc::new(OllamaTransformer::new(
//!         TransformerConfig::new("http://localhost:11434", "llama3.2"),
//!     )?);
//!
//!     let bytes = std::fs::read("week3-slides.pdf")?;
//!     let config = ConversionConfig::default();
//!     let output = convert(&bytes, transformer, &config).await?;
//!
//!     let document = output.into_document("week3-slides");
//!     println!("# {}\n\n{}", document.title, document.markdown);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `slidemark` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! slidemark = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod store;
pub mod title;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, PAGE_SEPARATOR};
pub use error::{SlidemarkError, StoreError, TransformError};
pub use llm::{OllamaTransformer, OpenAiTransformer, TextTransformer, TransformerConfig};
pub use output::{ConversionOutput, ConversionStats, Document, PageResult, RawPage};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use store::{download_filename, DocRecord, DocumentStore};
pub use title::{extract_title, fallback_from_filename};
