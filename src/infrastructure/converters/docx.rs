// src/infrastructure/converters/docx.rs
use crate::application::DocumentConverter;
use crate::domain::DomainError;
use html_escape::encode_text;
use roxmltree::{Document, Node};
use std::io::{Cursor, Read};
use tracing::{debug, instrument};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Word (.docx) to HTML.
///
/// Reads `word/document.xml` and keeps paragraphs, headings, bold/italic/
/// underline runs, line breaks and tables. Everything else (images, styles,
/// numbering) is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxConverter;

impl DocumentConverter for DocxConverter {
    #[instrument(level = "debug", skip(self, bytes), fields(len = bytes.len()))]
    fn convert(&self, bytes: &[u8]) -> Result<String, DomainError> {
        let xml = read_document_part(bytes)?;
        let document = Document::parse(&xml)
            .map_err(|e| DomainError::ImportFailed(format!("Invalid document XML: {}", e)))?;
        let body = document
            .descendants()
            .find(|node| has_tag(*node, "body"))
            .ok_or_else(|| DomainError::ImportFailed("Document has no body".to_string()))?;

        let mut html = String::new();
        for node in body.children().filter(Node::is_element) {
            if has_tag(node, "p") {
                render_paragraph(node, &mut html);
            } else if has_tag(node, "tbl") {
                render_table(node, &mut html);
            }
        }
        debug!(html_len = html.len(), "Converted DOCX");
        Ok(html)
    }
}

fn read_document_part(bytes: &[u8]) -> Result<String, DomainError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DomainError::ImportFailed(format!("Not a DOCX archive: {}", e)))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DomainError::ImportFailed(format!("Missing {}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| DomainError::ImportFailed(format!("Failed to read {}: {}", DOCUMENT_PART, e)))?;
    Ok(xml)
}

fn render_paragraph(paragraph: Node<'_, '_>, out: &mut String) {
    let inner = render_runs(paragraph);
    if inner.trim().is_empty() {
        return;
    }
    let tag = match heading_level(paragraph) {
        Some(level) => format!("h{}", level),
        None => "p".to_string(),
    };
    out.push_str(&format!("<{tag}>{inner}</{tag}>"));
}

fn render_runs(paragraph: Node<'_, '_>) -> String {
    let mut html = String::new();
    for run in paragraph.descendants().filter(|n| has_tag(*n, "r")) {
        let mut text = String::new();
        for child in run.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "t" => text.push_str(&encode_text(child.text().unwrap_or_default())),
                "tab" => text.push(' '),
                "br" | "cr" => text.push_str("<br>"),
                _ => {}
            }
        }
        if text.is_empty() {
            continue;
        }

        let props = run.children().find(|n| has_tag(*n, "rPr"));
        if is_on(props, "u") {
            text = format!("<u>{}</u>", text);
        }
        if is_on(props, "i") {
            text = format!("<em>{}</em>", text);
        }
        if is_on(props, "b") {
            text = format!("<strong>{}</strong>", text);
        }
        html.push_str(&text);
    }
    html
}

fn render_table(table: Node<'_, '_>, out: &mut String) {
    out.push_str("<table>");
    for row in table.children().filter(|n| has_tag(*n, "tr")) {
        out.push_str("<tr>");
        for cell in row.children().filter(|n| has_tag(*n, "tc")) {
            let paragraphs: Vec<String> = cell
                .children()
                .filter(|n| has_tag(*n, "p"))
                .map(render_runs)
                .filter(|p| !p.trim().is_empty())
                .collect();
            out.push_str(&format!("<td>{}</td>", paragraphs.join("<br>")));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
}

/// `Heading1`..`Heading6` (or `Title`) paragraph style
fn heading_level(paragraph: Node<'_, '_>) -> Option<u8> {
    let style = paragraph
        .children()
        .find(|n| has_tag(*n, "pPr"))?
        .children()
        .find(|n| has_tag(*n, "pStyle"))
        .and_then(|n| attribute_value(n, "val"))?
        .to_lowercase();

    if style == "title" {
        return Some(1);
    }
    style
        .strip_prefix("heading")?
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|level| (1..=6).contains(level))
}

/// Toggle property present and not switched off with `w:val="false"`
fn is_on(props: Option<Node<'_, '_>>, name: &str) -> bool {
    props
        .and_then(|p| p.children().find(|n| has_tag(*n, name)))
        .is_some_and(|n| !matches!(attribute_value(n, "val"), Some("0" | "false" | "none")))
}

fn has_tag(node: Node<'_, '_>, expected: &str) -> bool {
    node.is_element() && node.tag_name().name() == expected
}

fn attribute_value<'a>(node: Node<'a, 'a>, key: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attribute| attribute.name() == key)
        .map(|attribute| attribute.value())
}
