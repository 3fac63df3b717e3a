// src/ports/html.rs
use crate::domain::{Definition, DefinitionPayload, Dictionary, Note};
use crate::ports::markup::annotate_terms;
use crate::util::text::plain_text;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::instrument;

/// Renders a note as a standalone page: annotated body plus a glossary of
/// the terms it uses.
#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    /// Dictionary entries whose term occurs in the note text
    pub fn terms_in<'a>(&self, note: &Note, dictionary: &'a Dictionary) -> Vec<(&'a str, &'a [Definition])> {
        let text = plain_text(&note.content).to_lowercase();
        dictionary
            .iter()
            .filter(|(term, _)| text.contains(term))
            .collect()
    }

    fn render_definition(&self, definition: &Definition) -> String {
        let body = match &definition.payload {
            DefinitionPayload::Text(text) => format!("<div>{}</div>", encode_text(text)),
            DefinitionPayload::Image(image) => format!(
                r#"<img src="{}" alt="Reference">"#,
                encode_double_quoted_attribute(&image.url)
            ),
        };
        format!(
            r#"<li>{}<div class="source">Source: {}</div></li>"#,
            body,
            encode_text(&definition.source)
        )
    }

    #[instrument(level = "debug", skip_all, fields(note_id = note.id))]
    pub fn render(&self, note: &Note, dictionary: &Dictionary) -> String {
        let content = annotate_terms(&note.content, dictionary);
        let glossary: String = self
            .terms_in(note, dictionary)
            .into_iter()
            .map(|(term, definitions)| {
                let items: String = definitions.iter().map(|d| self.render_definition(d)).collect();
                format!(
                    r#"<section class="definition" id="term-{}"><h3>{}</h3><ul>{}</ul></section>"#,
                    encode_double_quoted_attribute(term),
                    encode_text(term),
                    items
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }}
        .note {{
            background: white;
            border-radius: 8px;
            padding: 2rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .term {{
            border-bottom: 2px dotted #3b82f6;
            cursor: help;
        }}
        mark {{
            background-color: #fde68a;
        }}
        .glossary {{
            margin-top: 2rem;
            padding-top: 1rem;
            border-top: 1px solid #eee;
        }}
        .definition img {{
            max-width: 100%;
            border-radius: 4px;
        }}
        .source, .note-info {{
            font-size: 0.8em;
            color: #888;
            font-style: italic;
        }}
    </style>
</head>
<body>
    <div class="note">
        <h1>{title}</h1>
        <div class="content">{content}</div>
        <div class="glossary">{glossary}</div>
        <div class="note-info">Note ID: {note_id} · {time}</div>
    </div>
</body>
</html>"#,
            title = encode_text(&note.title),
            content = content,
            glossary = if glossary.is_empty() {
                "<p>No terms defined</p>".to_string()
            } else {
                glossary
            },
            note_id = note.id,
            time = encode_text(&note.time),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::note;

    fn dictionary() -> Dictionary {
        let mut dict = Dictionary::new();
        dict.add(
            "ATP",
            Definition {
                id: 1,
                payload: DefinitionPayload::text("energy <currency>"),
                source: "Bio1".to_string(),
            },
        );
        dict.add(
            "chloroplast",
            Definition {
                id: 2,
                payload: DefinitionPayload::image("data:image/png;base64,AA"),
                source: "Bio2".to_string(),
            },
        );
        dict
    }

    #[test]
    fn given_note_with_terms_when_listing_terms_then_only_present_terms_returned() {
        let mut n = note(1, "Bio1", "study");
        n.content = "<p>ATP is made here</p>".to_string();

        let dict = dictionary();
        let terms: Vec<&str> = HtmlPresenter::new()
            .terms_in(&n, &dict)
            .into_iter()
            .map(|(t, _)| t)
            .collect();

        assert_eq!(terms, vec!["atp"]);
    }

    #[test]
    fn given_note_when_rendering_then_annotates_and_escapes_definitions() {
        let mut n = note(1, "Bio <1>", "study");
        n.content = "<p>ATP and chloroplast</p>".to_string();

        let html = HtmlPresenter::new().render(&n, &dictionary());

        assert!(html.contains("<title>Bio &lt;1&gt;</title>"));
        assert!(html.contains(r#"<span class="term" data-term="atp">ATP</span>"#));
        assert!(html.contains("energy &lt;currency&gt;"));
        assert!(html.contains(r#"<img src="data:image/png;base64,AA" alt="Reference">"#));
        assert!(html.contains("Source: Bio2"));
    }

    #[test]
    fn given_note_without_terms_when_rendering_then_shows_placeholder() {
        let n = note(1, "Empty", "study");

        let html = HtmlPresenter::new().render(&n, &Dictionary::new());

        assert!(html.contains("No terms defined"));
    }
}
