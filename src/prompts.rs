//! Instruction templates for LLM-based page refinement.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing how pages are cleaned up (e.g.
//!    tweaking bullet handling) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the rendered prompt without
//!    calling a real transformer, making prompt regressions easy to catch.
//!
//! Callers can override the template via
//! [`crate::config::ConversionConfig::page_prompt`]; the constant here is
//! used only when no override is provided. Overrides use the same `{page}`
//! and `{text}` placeholders.

/// Placeholder replaced with the 1-based page number.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Placeholder replaced with the raw extracted page text.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Default instruction template for refining one page of extracted text.
pub const DEFAULT_PAGE_PROMPT: &str = r#"You are an expert lecture-note editor. The text below was extracted from page {page} of a lecture-slide PDF. Rewrite it as clean, well-structured Markdown.

Follow these rules precisely:

1. HEADING
   - Start with a concise heading for the page as a `## ` line
   - Extract the slide's own title when one is present; otherwise synthesise one from the content

2. CONTENT
   - Preserve the original content ordering exactly
   - Normalise all bullet markers to `-`, keeping nesting
   - Keep numbered lists numbered
   - Leave tables and code exactly as written; do not add code fences around them

3. WHAT TO REMOVE
   - Page numbers
   - Institutional boilerplate (course codes, department footers, copyright lines)
   - Deck titles repeated on every slide

4. OUTPUT FORMAT
   - Output ONLY the Markdown body
   - Do NOT wrap the answer in ```markdown fences
   - Do NOT add commentary, explanations, or notes about what you changed

Page text:

{text}"#;

/// Render the instruction for one page.
///
/// `page_number` is 1-based — the number a reader would see on the slide,
/// not the internal index.
pub fn page_prompt(template: &str, page_number: usize, raw_text: &str) -> String {
    template
        .replace(PAGE_PLACEHOLDER, &page_number.to_string())
        .replace(TEXT_PLACEHOLDER, raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_embeds_page_and_text() {
        let p = page_prompt(DEFAULT_PAGE_PROMPT, 4, "Newton's laws");
        assert!(p.contains("page 4"));
        assert!(p.contains("Newton's laws"));
        assert!(!p.contains(PAGE_PLACEHOLDER));
        assert!(!p.contains(TEXT_PLACEHOLDER));
    }

    #[test]
    fn custom_template_placeholders() {
        let p = page_prompt("p{page}: {text}", 1, "hello");
        assert_eq!(p, "p1: hello");
    }
}
