// src/application/annotation.rs
use crate::application::{CollectionPath, RemoteStore, Workspace};
use crate::domain::definition::term_key;
use crate::domain::{Definition, DefinitionPayload, Dictionary, DomainError, Image};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Text,
    Image,
}

/// Where a note-editing session is in the add-definition flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnnotationState {
    #[default]
    Idle,
    /// Waiting for the user to select the term (text) or pick an image.
    /// `term` is pre-seeded when the flow was started from a popup.
    SelectingSource {
        kind: DefinitionKind,
        term: Option<String>,
    },
    AwaitingExplanation {
        term: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupContent {
    Definitions(Vec<Definition>),
    /// Term has no definitions yet; the popup offers "add text" / "add image"
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// Term as it appears in the note, casing preserved
    pub term: String,
    pub content: PopupContent,
    /// Opened by click; survives hover-out
    pub pinned: bool,
}

impl Popup {
    fn for_term(term: &str, dictionary: &Dictionary, pinned: bool) -> Self {
        let content = match dictionary.lookup(term) {
            Some(definitions) => PopupContent::Definitions(definitions.to_vec()),
            None => PopupContent::Empty,
        };
        Self {
            term: term.to_string(),
            content,
            pinned,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, PopupContent::Empty)
    }
}

/// Mutation requested by a finished annotation flow
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEffect {
    AddDefinition {
        term: String,
        payload: DefinitionPayload,
    },
}

/// Interaction state of one note editor: current text selection, popup and
/// the add-definition flow. Holds no collection data; finished flows return
/// an [`AnnotationEffect`] for the workspace to apply.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSession {
    state: AnnotationState,
    selection: Option<String>,
    popup: Option<Popup>,
}

impl AnnotationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnnotationState {
        &self.state
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Record the text currently highlighted in the editor. Blank selections clear it.
    pub fn set_selection(&mut self, text: &str) {
        let trimmed = text.trim();
        self.selection = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Show the definitions of `term`. A pinned popup is not replaced by hovering.
    pub fn hover(&mut self, term: &str, dictionary: &Dictionary) -> Option<&Popup> {
        if !self.popup.as_ref().is_some_and(|p| p.pinned) {
            self.popup = Some(Popup::for_term(term, dictionary, false));
        }
        self.popup.as_ref()
    }

    pub fn click(&mut self, term: &str, dictionary: &Dictionary) -> &Popup {
        self.popup.insert(Popup::for_term(term, dictionary, true))
    }

    pub fn hover_out(&mut self) {
        if !self.popup.as_ref().is_some_and(|p| p.pinned) {
            self.popup = None;
        }
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn begin_text_definition(&mut self) -> Result<(), DomainError> {
        self.begin(DefinitionKind::Text)
    }

    pub fn begin_image_definition(&mut self) -> Result<(), DomainError> {
        self.begin(DefinitionKind::Image)
    }

    fn begin(&mut self, kind: DefinitionKind) -> Result<(), DomainError> {
        if self.state != AnnotationState::Idle {
            return Err(self.invalid("begin a definition"));
        }
        let term = self.popup.take().map(|p| p.term);
        debug!(?kind, ?term, "Selecting definition source");
        self.state = AnnotationState::SelectingSource { kind, term };
        Ok(())
    }

    /// Take the current selection (or the pre-seeded term) as the term to define
    pub fn confirm_selection(&mut self) -> Result<String, DomainError> {
        let AnnotationState::SelectingSource {
            kind: DefinitionKind::Text,
            term,
        } = &self.state
        else {
            return Err(self.invalid("confirm a selection"));
        };

        let term = self
            .selection
            .clone()
            .or_else(|| term.clone())
            .ok_or(DomainError::NoSelection)?;
        self.state = AnnotationState::AwaitingExplanation { term: term.clone() };
        Ok(term)
    }

    /// Finish the text flow. Blank text cancels it and yields no effect.
    pub fn submit_explanation(&mut self, text: &str) -> Result<Option<AnnotationEffect>, DomainError> {
        let AnnotationState::AwaitingExplanation { term } = &self.state else {
            return Err(self.invalid("submit an explanation"));
        };

        let text = text.trim();
        let effect = (!text.is_empty()).then(|| AnnotationEffect::AddDefinition {
            term: term.clone(),
            payload: DefinitionPayload::text(text),
        });
        if effect.is_none() {
            debug!(term = %term, "Empty explanation, flow cancelled");
        }
        self.reset();
        Ok(effect)
    }

    /// Finish the image flow with the image picked in the gallery
    pub fn choose_image(&mut self, image: &Image) -> Result<AnnotationEffect, DomainError> {
        let AnnotationState::SelectingSource {
            kind: DefinitionKind::Image,
            term,
        } = &self.state
        else {
            return Err(self.invalid("choose an image"));
        };

        let term = self
            .selection
            .clone()
            .or_else(|| term.clone())
            .ok_or(DomainError::NoSelection)?;
        self.reset();
        Ok(AnnotationEffect::AddDefinition {
            term,
            payload: DefinitionPayload::image(image.url.clone()),
        })
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = AnnotationState::Idle;
        self.selection = None;
    }

    fn invalid(&self, action: &str) -> DomainError {
        DomainError::InvalidTransition(format!("cannot {} while {:?}", action, self.state))
    }
}

impl<S: RemoteStore> Workspace<S> {
    /// Append a definition under `term`, sourced from the active note
    #[instrument(level = "debug", skip(self, payload))]
    pub fn add_definition(&mut self, term: &str, payload: DefinitionPayload) -> Result<Definition, DomainError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(DomainError::InvalidSelection(
                "term must not be blank".to_string(),
            ));
        }

        let source = self
            .active_note()
            .map(|n| n.title.clone())
            .unwrap_or_else(|| self.options.unknown_source.clone());
        let definition = Definition {
            id: self.next_id(),
            payload,
            source,
        };

        self.dictionary.add(term, definition.clone());
        self.persist(CollectionPath::Explanations);
        info!(term = %term_key(term), id = definition.id, "Definition added");
        Ok(definition)
    }

    pub fn apply_annotation(&mut self, effect: AnnotationEffect) -> Result<Definition, DomainError> {
        match effect {
            AnnotationEffect::AddDefinition { term, payload } => self.add_definition(&term, payload),
        }
    }

    /// Remove one definition; the term disappears with its last definition
    pub fn delete_definition(&mut self, term: &str, id: i64) -> Result<Definition, DomainError> {
        let removed = self.dictionary.remove(term, id)?;
        self.persist(CollectionPath::Explanations);
        info!(term = %term_key(term), id, "Definition deleted");
        Ok(removed)
    }
}
