// src/util/text.rs
use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BLOCK_TAG_REGEX: Regex =
        Regex::new(r"</?(p|div|br|li|h[1-6]|tr)[^>]*>").expect("Failed to compile block tag regex");
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>?").expect("Failed to compile tag regex");
    static ref WHITESPACE_REGEX: Regex =
        Regex::new(r"\s+").expect("Failed to compile whitespace regex");
}

/// Plain text of HTML content.
///
/// Block-level tags become spaces, all other tags are removed, entities are
/// decoded and runs of whitespace collapse to a single space.
///
/// # Examples
///
/// ```
/// use termnote::util::text::plain_text;
///
/// let html = "<p>Trees &amp; Graphs</p><p>Second</p>";
/// assert_eq!(plain_text(html), "Trees & Graphs Second");
/// ```
pub fn plain_text(html: &str) -> String {
    let spaced = BLOCK_TAG_REGEX.replace_all(html, " ");
    let no_tags = TAG_REGEX.replace_all(&spaced, "");
    let decoded = decode_html_entities(&no_tags);
    WHITESPACE_REGEX
        .replace_all(&decoded, " ")
        .trim()
        .to_string()
}

/// Note preview: the first `limit` characters of the plain text, followed by
/// an ellipsis.
///
/// Markup is stripped before counting, so tags never use up the limit.
pub fn preview(html: &str, limit: usize) -> String {
    let excerpt: String = plain_text(html).chars().take(limit).collect();
    format!("{}...", excerpt)
}
