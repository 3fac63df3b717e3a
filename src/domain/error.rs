// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Note not found: {0}")]
    NoteNotFound(i64),
    #[error("Folder not found: {0}")]
    FolderNotFound(String),
    #[error("System folder cannot be deleted: {0}")]
    SystemFolder(String),
    #[error("Definition {id} not found for term '{term}'")]
    DefinitionNotFound { term: String, id: i64 },
    #[error("Image not found: {0}")]
    ImageNotFound(i64),
    #[error("No text selected")]
    NoSelection,
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Annotation flow error: {0}")]
    InvalidTransition(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Import failed: {0}")]
    ImportFailed(String),
    #[error("Store error: {0}")]
    StoreError(String),
}
