// src/ports/mod.rs
pub mod html;
pub mod markup;

pub use html::HtmlPresenter;
pub use markup::{annotate_terms, strip_term_spans, toggle_highlight, TextRange};
