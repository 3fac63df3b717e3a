// src/domain/mod.rs
pub mod definition;
pub mod error;
pub mod folder;
pub mod id;
pub mod image;
pub mod note;

pub use definition::{Definition, DefinitionPayload, Dictionary};
pub use error::DomainError;
pub use folder::{Folder, FolderKind, SystemFolder};
pub use id::IdGenerator;
pub use image::Image;
pub use note::Note;
