// src/application/mod.rs
pub mod annotation;
pub mod clock;
pub mod gallery;
pub mod importer;
pub mod organizer;
pub mod store;
pub mod sync;
pub mod workspace;

pub use annotation::{
    AnnotationEffect, AnnotationSession, AnnotationState, DefinitionKind, Popup, PopupContent,
};
pub use clock::Clock;
pub use gallery::{encode_data_url, GalleryAction, GalleryMode, GalleryView, ImageSource};
pub use importer::{DocumentConverter, ImportSource};
pub use organizer::DeleteOutcome;
pub use store::{Listener, RemoteStore, Subscription};
pub use sync::{CollectionPath, RemoteEvent, SyncStatus};
pub use workspace::{Workspace, WorkspaceOptions};
