//! Mention extraction. Turns free-form content into the display names it tags.
//!
//! A mention starts at `@` and runs over whitespace-separated words, allowing
//! exactly one whitespace character between words. It stops at the next `@`,
//! at a run of two or more whitespace characters, or at the end of the text.
//! Trailing punctuation and prose are part of the capture: `"hi @Ann Lee!"`
//! yields `"Ann Lee!"`, and `"@Jane Doe hello @Bob"` yields `"Jane Doe hello"`.

use regex::Regex;
use std::sync::LazyLock;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([^\s@]+(?:\s[^\s@]+)*)").unwrap());

/// Extract tagged display names in source order. Repeats are kept.
pub fn extract_mentions(content: &str) -> Vec<String> {
    MENTION
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
