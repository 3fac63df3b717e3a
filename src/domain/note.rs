// src/domain/note.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    /// Rich text (HTML)
    #[serde(default)]
    pub content: String,
    /// Plain-text excerpt shown in note lists
    #[serde(default)]
    pub preview: String,
    /// Display timestamp, e.g. "14:05"
    #[serde(default)]
    pub time: String,
    pub folder_id: String,
}

impl Note {
    pub fn is_trashed(&self) -> bool {
        self.folder_id == crate::domain::SystemFolder::Deleted.id()
    }
}
