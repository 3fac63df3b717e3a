// src/infrastructure/converters/mod.rs
pub mod docx;
pub mod markdown;

pub use docx::DocxConverter;
pub use markdown::MarkdownConverter;

use crate::application::DocumentConverter;
use crate::domain::DomainError;
use html_escape::encode_text;
use std::path::Path;

/// Extensions `converter_for` accepts, lower-case
pub const SUPPORTED_EXTENSIONS: &[&str] = &["docx", "md", "markdown", "html", "htm", "txt"];

/// HTML files are taken as-is
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlConverter;

impl DocumentConverter for HtmlConverter {
    fn convert(&self, bytes: &[u8]) -> Result<String, DomainError> {
        Ok(utf8(bytes)?.to_string())
    }
}

/// Blank-line separated paragraphs; single newlines become `<br>`
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextConverter;

impl DocumentConverter for PlainTextConverter {
    fn convert(&self, bytes: &[u8]) -> Result<String, DomainError> {
        let text = utf8(bytes)?.replace("\r\n", "\n");
        Ok(text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("<p>{}</p>", encode_text(p).replace('\n', "<br>")))
            .collect())
    }
}

/// Pick a converter by file extension
pub fn converter_for(file_name: &str) -> Result<Box<dyn DocumentConverter>, DomainError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "docx" => Ok(Box::new(DocxConverter)),
        "md" | "markdown" => Ok(Box::new(MarkdownConverter)),
        "html" | "htm" => Ok(Box::new(HtmlConverter)),
        "txt" => Ok(Box::new(PlainTextConverter)),
        _ => Err(DomainError::UnsupportedFormat(file_name.to_string())),
    }
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
}

pub(crate) fn utf8(bytes: &[u8]) -> Result<&str, DomainError> {
    std::str::from_utf8(bytes)
        .map_err(|e| DomainError::ImportFailed(format!("Document is not valid UTF-8: {}", e)))
}
