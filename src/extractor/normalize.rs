//! Text cleanup shared by every extraction pipeline.

use regex::Regex;
use std::sync::LazyLock;

/// Two or more line breaks, possibly with whitespace between them.
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Deliberately naive; matches what feed publishers put in descriptions.
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Collapse whitespace inside paragraphs and keep a single blank line
/// between them. Leading and trailing whitespace is dropped.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(text: &str) -> String {
    PARAGRAPH_BREAK
        .split(text)
        .map(collapse_whitespace)
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Collapse every whitespace run, newlines included, to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Remove anything that looks like a tag, then trim.
pub fn strip_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").trim().to_string()
}
