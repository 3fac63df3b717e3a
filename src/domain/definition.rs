// src/domain/definition.rs
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageTag {
    Image,
}

/// Reference to an image embedded as a definition, stored as `{type: "image", url}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(rename = "type")]
    pub tag: ImageTag,
    pub url: String,
}

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            tag: ImageTag::Image,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefinitionPayload {
    Text(String),
    Image(ImageRef),
}

impl DefinitionPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Image(ImageRef::new(url))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub id: i64,
    #[serde(rename = "text")]
    pub payload: DefinitionPayload,
    /// Title of the note the definition was written from
    pub source: String,
}

/// Storage key for a term
pub fn term_key(term: &str) -> String {
    term.to_lowercase()
}

/// Term dictionary: lower-cased term -> definitions in insertion order.
///
/// A term never maps to an empty list; removing the last definition removes
/// the term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: BTreeMap<String, Vec<Definition>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn add(&mut self, term: &str, definition: Definition) {
        self.entries
            .entry(term_key(term))
            .or_default()
            .push(definition);
    }

    pub fn lookup(&self, term: &str) -> Option<&[Definition]> {
        self.entries.get(&term_key(term)).map(Vec::as_slice)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(&term_key(term))
    }

    pub fn remove(&mut self, term: &str, id: i64) -> Result<Definition, DomainError> {
        let key = term_key(term);
        let not_found = || DomainError::DefinitionNotFound {
            term: key.clone(),
            id,
        };

        let definitions = self.entries.get_mut(&key).ok_or_else(not_found)?;
        let position = definitions
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(not_found)?;
        let removed = definitions.remove(position);

        if definitions.is_empty() {
            self.entries.remove(&key);
        }
        Ok(removed)
    }

    /// All term keys, sorted
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Definition])> {
        self.entries
            .iter()
            .map(|(term, defs)| (term.as_str(), defs.as_slice()))
    }

    /// Terms whose key or any text definition contains `query`, case-insensitively
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = query.to_lowercase();
        self.iter()
            .filter(|(term, defs)| {
                term.contains(&needle)
                    || defs.iter().any(|d| {
                        d.payload
                            .as_text()
                            .is_some_and(|text| text.to_lowercase().contains(&needle))
                    })
            })
            .map(|(term, _)| term)
            .collect()
    }
}
