//! Post-processing: deterministic cleanup of transformer output.
//!
//! Even well-prompted models occasionally wrap their answer in
//! ` ```markdown ... ``` ` fences despite the prompt saying not to, or emit
//! Windows-style `\r\n` line endings. These cheap string rules fix the
//! transport quirks without touching content, keeping the prompt focused on
//! *what to extract* rather than formatting edge-cases.

use once_cell::sync::Lazy;
use regex::Regex;

/// Clean one page of transformer output.
///
/// Rules (applied in order):
/// 1. Strip a single outer markdown fence pair
/// 2. Normalise line endings (CRLF → LF)
/// 3. Trim leading/trailing whitespace
pub fn clean_page(input: &str) -> String {
    let s = strip_outer_fences(input);
    let s = normalise_line_endings(&s);
    s.trim().to_string()
}

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown)?\s*\n(.*)\n```\s*$").unwrap());

fn strip_outer_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fence_wrapper() {
        let input = "```markdown\n## Title\n\nBody text.\n```";
        assert_eq!(clean_page(input), "## Title\n\nBody text.");
    }

    #[test]
    fn strips_bare_fence_wrapper() {
        let input = "```\n## Title\n```";
        assert_eq!(clean_page(input), "## Title");
    }

    #[test]
    fn keeps_inner_fences() {
        let input = "## Code\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(clean_page(input), "## Code\n\n```rust\nfn main() {}\n```");
    }

    #[test]
    fn normalises_crlf() {
        assert_eq!(clean_page("## A\r\nline\r\n"), "## A\nline");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(clean_page("  \n## A\n\n"), "## A");
        assert_eq!(clean_page(""), "");
    }
}
