// src/application/sync.rs
use crate::constants::{EXPLANATIONS_PATH, FOLDERS_PATH, IMAGES_PATH, NOTES_PATH};
use crate::domain::DomainError;
use serde_json::Value;
use std::fmt;

/// The four collections mirrored to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionPath {
    Notes,
    Folders,
    Explanations,
    Images,
}

impl CollectionPath {
    pub const ALL: [CollectionPath; 4] = [
        CollectionPath::Notes,
        CollectionPath::Folders,
        CollectionPath::Explanations,
        CollectionPath::Images,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionPath::Notes => NOTES_PATH,
            CollectionPath::Folders => FOLDERS_PATH,
            CollectionPath::Explanations => EXPLANATIONS_PATH,
            CollectionPath::Images => IMAGES_PATH,
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot delivered by a store listener, queued until the workspace drains it
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEvent {
    pub path: CollectionPath,
    pub value: Option<Value>,
}

/// Outcome of upstream writes. Failed writes are not retried; local state
/// stays ahead of the store until the next successful write or snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStatus {
    failed_writes: usize,
    last_error: Option<String>,
    last_failed_path: Option<CollectionPath>,
}

impl SyncStatus {
    pub fn record_failure(&mut self, path: CollectionPath, error: &DomainError) {
        self.failed_writes += 1;
        self.last_error = Some(error.to_string());
        self.last_failed_path = Some(path);
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_failed_path(&self) -> Option<CollectionPath> {
        self.last_failed_path
    }

    pub fn is_clean(&self) -> bool {
        self.failed_writes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_paths_then_map_to_store_keys() {
        let keys: Vec<&str> = CollectionPath::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(keys, vec!["notes", "folders", "explanations", "images"]);
    }

    #[test]
    fn given_failures_when_recording_then_counts_and_keeps_last_error() {
        let mut status = SyncStatus::default();
        assert!(status.is_clean());

        status.record_failure(
            CollectionPath::Notes,
            &DomainError::StoreError("offline".to_string()),
        );
        status.record_failure(
            CollectionPath::Images,
            &DomainError::StoreError("quota".to_string()),
        );

        assert_eq!(status.failed_writes(), 2);
        assert_eq!(status.last_error(), Some("Store error: quota"));
        assert_eq!(status.last_failed_path(), Some(CollectionPath::Images));
    }
}
