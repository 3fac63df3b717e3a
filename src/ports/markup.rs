// src/ports/markup.rs
use crate::domain::definition::term_key;
use crate::domain::{DomainError, Dictionary};
use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    static ref TERM_SPAN_REGEX: Regex = Regex::new(r#"(?s)<span class="term" data-term="[^"]*">(.*?)</span>"#)
        .expect("Failed to compile term span regex");
    static ref TAG_OR_TEXT_REGEX: Regex =
        Regex::new(r"(?s)<[^>]*>|[^<]+").expect("Failed to compile tag regex");
}

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Byte range into a note's HTML content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range of the first occurrence of `needle` in the text of `html`.
    /// Tags are skipped, so a match never starts inside markup.
    pub fn find(html: &str, needle: &str) -> Option<Self> {
        if needle.is_empty() {
            return None;
        }
        TAG_OR_TEXT_REGEX
            .find_iter(html)
            .filter(|token| !token.as_str().starts_with('<'))
            .find_map(|token| {
                token
                    .as_str()
                    .find(needle)
                    .map(|offset| token.start() + offset)
            })
            .map(|start| Self::new(start, start + needle.len()))
    }
}

/// Wrap every occurrence of a dictionary term in `<span class="term">`.
///
/// Matching is case-insensitive and only touches text outside tags. Longer
/// terms win over terms they contain. Existing term spans are rebuilt, so
/// annotating twice gives the same result.
pub fn annotate_terms(html: &str, dictionary: &Dictionary) -> String {
    let html = strip_term_spans(html);
    let Some(pattern) = term_pattern(dictionary) else {
        return html;
    };
    let matcher = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            warn!(error = %e, "Term pattern rejected, content left unannotated");
            return html;
        }
    };

    let mut out = String::with_capacity(html.len());
    for token in TAG_OR_TEXT_REGEX.find_iter(&html) {
        let token = token.as_str();
        if token.starts_with('<') {
            out.push_str(token);
            continue;
        }
        let wrapped = matcher.replace_all(token, |caps: &regex::Captures| {
            let found = &caps[0];
            // `found` is escaped text; the key is the decoded term
            format!(
                r#"<span class="term" data-term="{}">{}</span>"#,
                encode_double_quoted_attribute(&term_key(&decode_html_entities(found))),
                found
            )
        });
        out.push_str(&wrapped);
    }
    out
}

/// Remove term spans, keeping their text
pub fn strip_term_spans(html: &str) -> String {
    TERM_SPAN_REGEX.replace_all(html, "$1").into_owned()
}

fn term_pattern(dictionary: &Dictionary) -> Option<String> {
    let mut terms: Vec<&str> = dictionary.terms().filter(|t| !t.trim().is_empty()).collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

    let alternatives: Vec<String> = terms
        .iter()
        .map(|term| {
            // Terms are matched against escaped text
            let escaped = regex::escape(&encode_text(term));
            let lead = if starts_word(term) { r"\b" } else { "" };
            let tail = if ends_word(term) { r"\b" } else { "" };
            format!("{}{}{}", lead, escaped, tail)
        })
        .collect();
    Some(format!("(?i)(?:{})", alternatives.join("|")))
}

fn starts_word(term: &str) -> bool {
    term.chars().next().is_some_and(char::is_alphanumeric)
}

fn ends_word(term: &str) -> bool {
    term.chars().last().is_some_and(char::is_alphanumeric)
}

/// Wrap the range in `<mark>`, or unwrap it if it already is exactly a mark.
///
/// The range must sit inside one text run: no tag may start or end in it.
pub fn toggle_highlight(html: &str, range: TextRange) -> Result<String, DomainError> {
    let TextRange { start, end } = range;
    if start >= end || end > html.len() || !html.is_char_boundary(start) || !html.is_char_boundary(end) {
        return Err(DomainError::InvalidSelection(format!(
            "range {}..{} outside content",
            start, end
        )));
    }

    let selected = &html[start..end];
    if selected.contains('<') || selected.contains('>') || inside_tag(html, start) {
        return Err(DomainError::InvalidSelection(
            "selection crosses markup".to_string(),
        ));
    }

    if html[..start].ends_with(MARK_OPEN) && html[end..].starts_with(MARK_CLOSE) {
        return Ok(format!(
            "{}{}{}",
            &html[..start - MARK_OPEN.len()],
            selected,
            &html[end + MARK_CLOSE.len()..]
        ));
    }

    Ok(format!(
        "{}{}{}{}{}",
        &html[..start],
        MARK_OPEN,
        selected,
        MARK_CLOSE,
        &html[end..]
    ))
}

fn inside_tag(html: &str, position: usize) -> bool {
    let before = &html[..position];
    match (before.rfind('<'), before.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Definition, DefinitionPayload};
    use rstest::rstest;

    fn dictionary(terms: &[&str]) -> Dictionary {
        let mut dict = Dictionary::new();
        for (i, term) in terms.iter().enumerate() {
            dict.add(
                term,
                Definition {
                    id: i as i64,
                    payload: DefinitionPayload::text("x"),
                    source: "Bio1".to_string(),
                },
            );
        }
        dict
    }

    #[test]
    fn given_known_term_when_annotating_then_wraps_with_lowercase_key() {
        let html = annotate_terms("<p>ATP powers cells</p>", &dictionary(&["atp"]));

        assert_eq!(
            html,
            r#"<p><span class="term" data-term="atp">ATP</span> powers cells</p>"#
        );
    }

    #[test]
    fn given_overlapping_terms_when_annotating_then_longest_wins() {
        let html = annotate_terms("cell cycle and cell", &dictionary(&["cell", "cell cycle"]));

        assert_eq!(
            html,
            r#"<span class="term" data-term="cell cycle">cell cycle</span> and <span class="term" data-term="cell">cell</span>"#
        );
    }

    #[test]
    fn given_term_inside_tag_attribute_when_annotating_then_leaves_tag_alone() {
        let html = annotate_terms(r#"<a href="atp.html">ATP</a>"#, &dictionary(&["atp"]));

        assert_eq!(
            html,
            r#"<a href="atp.html"><span class="term" data-term="atp">ATP</span></a>"#
        );
    }

    #[test]
    fn given_term_inside_longer_word_when_annotating_then_not_matched() {
        let html = annotate_terms("matplotlib", &dictionary(&["atp"]));

        assert_eq!(html, "matplotlib");
    }

    #[test]
    fn given_annotated_html_when_annotating_again_then_unchanged() {
        let dict = dictionary(&["atp", "mitosis"]);
        let once = annotate_terms("<p>ATP and Mitosis</p>", &dict);

        let twice = annotate_terms(&once, &dict);

        assert_eq!(once, twice);
        assert_eq!(strip_term_spans(&twice), "<p>ATP and Mitosis</p>");
    }

    #[test]
    fn given_term_with_ampersand_when_annotating_then_key_is_decoded_term() {
        let dict = dictionary(&["a&b"]);

        let html = annotate_terms("<p>A&amp;B rules</p>", &dict);

        assert_eq!(
            html,
            r#"<p><span class="term" data-term="a&amp;b">A&amp;B</span> rules</p>"#
        );
        let key = decode_html_entities("a&amp;b");
        assert!(dict.contains(&key));
    }

    #[test]
    fn given_needle_inside_tag_when_finding_then_returns_text_occurrence() {
        let html = r#"<p class="x">a class act</p>"#;

        let range = TextRange::find(html, "class").unwrap();

        assert_eq!(&html[range.start..range.end], "class");
        assert_eq!(range.start, html.rfind("class").unwrap());
        assert!(toggle_highlight(html, range).is_ok());
    }

    #[test]
    fn given_needle_only_in_markup_when_finding_then_none() {
        assert_eq!(TextRange::find(r#"<p class="x">text</p>"#, "class"), None);
    }

    #[test]
    fn given_empty_dictionary_when_annotating_then_returns_input() {
        assert_eq!(annotate_terms("<p>ATP</p>", &Dictionary::new()), "<p>ATP</p>");
    }

    #[test]
    fn given_plain_range_when_toggling_twice_then_marks_and_unmarks() {
        let html = "<p>energy currency</p>";
        let range = TextRange::find(html, "energy").unwrap();

        let marked = toggle_highlight(html, range).unwrap();
        assert_eq!(marked, "<p><mark>energy</mark> currency</p>");

        let range = TextRange::find(&marked, "energy").unwrap();
        let unmarked = toggle_highlight(&marked, range).unwrap();
        assert_eq!(unmarked, html);
    }

    #[rstest]
    #[case(TextRange::new(3, 3))]
    #[case(TextRange::new(0, 100))]
    #[case(TextRange::new(1, 5))]
    #[case(TextRange::new(0, 8))]
    fn given_invalid_range_when_toggling_then_rejects(#[case] range: TextRange) {
        let result = toggle_highlight("<p>energy</p>", range);

        assert!(matches!(result, Err(DomainError::InvalidSelection(_))));
    }
}
