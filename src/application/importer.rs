// src/application/importer.rs
use crate::application::{RemoteStore, Workspace};
use crate::domain::{DomainError, Note};
use crate::util::text::preview;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Converts raw document bytes into rich-text HTML
pub trait DocumentConverter {
    fn convert(&self, bytes: &[u8]) -> Result<String, DomainError>;
}

/// File picked for import
#[derive(Debug, Clone)]
pub struct ImportSource {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImportSource {
    /// File name without its extension
    pub fn title(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone())
    }
}

impl<S: RemoteStore> Workspace<S> {
    /// Convert a document into a new note at the top of `target`.
    ///
    /// `target` defaults to the active folder. A conversion failure leaves the
    /// workspace untouched.
    #[instrument(level = "debug", skip(self, source, converter), fields(file = %source.file_name))]
    pub fn import_document(
        &mut self,
        source: &ImportSource,
        target: Option<&str>,
        converter: &dyn DocumentConverter,
    ) -> Result<Note, DomainError> {
        let folder_id = target.unwrap_or(self.active_folder_id.as_str()).to_string();
        if self.folder(&folder_id).is_none() {
            return Err(DomainError::FolderNotFound(folder_id));
        }

        let content = converter.convert(&source.bytes).map_err(|e| {
            warn!(file = %source.file_name, error = %e, "Document conversion failed");
            match e {
                DomainError::ImportFailed(_) => e,
                other => DomainError::ImportFailed(other.to_string()),
            }
        })?;

        let note = Note {
            id: self.next_id(),
            title: source.title(),
            preview: preview(&content, self.options.preview_chars),
            content,
            time: self.display_time(),
            folder_id,
        };
        self.insert_note(note.clone());
        info!(note_id = note.id, folder_id = %note.folder_id, "Document imported");
        Ok(note)
    }
}
