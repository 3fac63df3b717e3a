// src/infrastructure/converters/markdown.rs
use crate::application::DocumentConverter;
use crate::domain::DomainError;
use crate::infrastructure::converters::utf8;
use lazy_static::lazy_static;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

lazy_static! {
    static ref NEWLINE_TAG_REGEX: Regex =
        Regex::new(r"\n?(<.+?>)\n?").expect("Failed to compile newline tag regex");
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownConverter;

impl DocumentConverter for MarkdownConverter {
    fn convert(&self, bytes: &[u8]) -> Result<String, DomainError> {
        Ok(markdown_to_html(utf8(bytes)?))
    }
}

pub fn markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(text, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    // Newlines between tags show up as stray breaks in the editor
    NEWLINE_TAG_REGEX.replace_all(&html_output, "$1").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_markdown_text_when_converting_then_renders_html() {
        let html = markdown_to_html("# Krebs\n\n**bold** and *italic*");

        assert_eq!(
            html,
            "<h1>Krebs</h1><p><strong>bold</strong> and <em>italic</em></p>"
        );
    }

    #[test]
    fn given_markdown_table_when_converting_then_renders_table() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |");

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
        assert!(!html.contains('\n'));
    }

    #[test]
    fn given_invalid_utf8_when_converting_then_import_fails() {
        let result = MarkdownConverter.convert(&[0xff, 0xfe]);

        assert!(matches!(result, Err(DomainError::ImportFailed(_))));
    }
}
