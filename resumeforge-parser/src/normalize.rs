//! Whitespace normalization for extracted text.

use once_cell::sync::Lazy;
use regex::Regex;

// `\s` leaves out the ASCII information separators U+001C..U+001F; they separate text here too.
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\x1C-\x1F]+").expect("whitespace pattern is valid"));

/// Collapse every run of whitespace (newlines, tabs and the ASCII separator controls included)
/// to a single space and trim both ends.
pub fn clean_text(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw, " ").trim().to_string()
}
