//! Title derivation from assembled Markdown.
//!
//! The refinement prompt asks the transformer to open each page with a
//! `## ` heading, so the first such heading in the assembled document is
//! the natural document title. When no heading survived (image-only decks,
//! transformer output without structure), the caller supplies a fallback —
//! conventionally the original file's base name.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// First line that is a `## ` heading, optionally indented.
///
/// Deliberately anchored to exactly two `#` — deeper headings (`###`) are
/// sub-structure, not document titles, and a lone `#` never appears in
/// refined output (the prompt reserves it).
static RE_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*## (.+)$").unwrap());

/// Extract the document title from `markdown`.
///
/// Returns the trimmed text of the first `## ` heading, or `fallback`
/// unchanged when the document contains none. Pure and deterministic.
pub fn extract_title(markdown: &str, fallback: &str) -> String {
    match RE_TITLE.captures(markdown) {
        Some(caps) => caps[1].trim().to_string(),
        None => fallback.to_string(),
    }
}

/// Derive the conventional fallback title from the uploaded file's name:
/// the base name without its extension, or the name as-is when it has none.
pub fn fallback_from_filename(pdf_name: &str) -> String {
    Path::new(pdf_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf_name.to_string())
}
