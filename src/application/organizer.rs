// src/application/organizer.rs
use crate::application::{CollectionPath, RemoteStore, Workspace};
use crate::constants::NEW_FOLDER_NAME;
use crate::domain::folder::custom_insert_position;
use crate::domain::{DomainError, Folder, Note, SystemFolder};
use crate::util::text::preview;
use tracing::{debug, info, instrument};

/// What `delete_note` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Moved to the `deleted` folder
    SoftDeleted,
    /// Was already trashed and has been removed for good
    Purged,
    /// No note with that id
    Missing,
}

impl<S: RemoteStore> Workspace<S> {
    /// Create a custom folder named "New Folder" at the end of the custom
    /// block and make it active.
    #[instrument(level = "debug", skip(self))]
    pub fn add_folder(&mut self) -> Folder {
        let folder = Folder::custom(self.next_id().to_string(), NEW_FOLDER_NAME);
        let position = custom_insert_position(&self.folders);
        self.folders.insert(position, folder.clone());
        self.persist(CollectionPath::Folders);

        self.active_folder_id = folder.id.clone();
        info!(folder_id = %folder.id, "Folder added");
        folder
    }

    /// Rename the folder with `id`. System folders are not protected here.
    pub fn rename_folder(&mut self, id: &str, name: &str) -> bool {
        let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) else {
            debug!(folder_id = id, "Rename of unknown folder ignored");
            return false;
        };
        folder.name = name.to_string();
        self.persist(CollectionPath::Folders);
        true
    }

    /// Remove a custom folder and move its notes to the trash
    #[instrument(level = "debug", skip(self))]
    pub fn delete_folder(&mut self, id: &str) -> Result<(), DomainError> {
        let folder = self
            .folder(id)
            .ok_or_else(|| DomainError::FolderNotFound(id.to_string()))?;
        if folder.is_system() {
            return Err(DomainError::SystemFolder(id.to_string()));
        }

        self.folders.retain(|f| f.id != id);
        self.persist(CollectionPath::Folders);

        let trash = SystemFolder::Deleted.id();
        let mut moved = 0;
        for note in self.notes.iter_mut().filter(|n| n.folder_id == id) {
            note.folder_id = trash.to_string();
            moved += 1;
        }
        if moved > 0 {
            self.persist(CollectionPath::Notes);
        }

        if self.active_folder_id == id {
            self.active_folder_id = SystemFolder::Notes.id().to_string();
        }
        info!(folder_id = id, moved, "Folder deleted");
        Ok(())
    }

    pub fn rename_note(&mut self, id: i64, title: &str) -> bool {
        self.update_note(id, |note| note.title = title.to_string())
    }

    pub fn move_note(&mut self, id: i64, folder_id: &str) -> bool {
        self.update_note(id, |note| note.folder_id = folder_id.to_string())
    }

    /// Replace the rich-text body of a note and refresh its preview
    pub fn update_note_content(&mut self, id: i64, content: &str) -> bool {
        let preview_chars = self.options.preview_chars;
        self.update_note(id, |note| {
            note.content = content.to_string();
            note.preview = preview(content, preview_chars);
        })
    }

    /// Trash a note, or purge it when it is already in the trash
    #[instrument(level = "debug", skip(self))]
    pub fn delete_note(&mut self, id: i64) -> DeleteOutcome {
        let Some(position) = self.notes.iter().position(|n| n.id == id) else {
            debug!(note_id = id, "Delete of unknown note ignored");
            return DeleteOutcome::Missing;
        };

        let outcome = if self.notes[position].is_trashed() {
            self.notes.remove(position);
            DeleteOutcome::Purged
        } else {
            self.notes[position].folder_id = SystemFolder::Deleted.id().to_string();
            DeleteOutcome::SoftDeleted
        };
        self.persist(CollectionPath::Notes);

        if self.active_note_id == Some(id) {
            self.active_note_id = None;
        }
        info!(note_id = id, ?outcome, "Note deleted");
        outcome
    }

    /// Put a new note at the top of the list, select it and switch to its folder
    pub(crate) fn insert_note(&mut self, note: Note) {
        let note_id = note.id;
        let folder_id = note.folder_id.clone();
        self.notes.insert(0, note);
        self.persist(CollectionPath::Notes);

        self.active_note_id = Some(note_id);
        if self.active_folder_id != folder_id {
            self.active_folder_id = folder_id;
        }
    }

    fn update_note(&mut self, id: i64, change: impl FnOnce(&mut Note)) -> bool {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            debug!(note_id = id, "Update of unknown note ignored");
            return false;
        };
        change(note);
        self.persist(CollectionPath::Notes);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::WorkspaceOptions;
    use crate::infrastructure::MemoryStore;
    use crate::util::testing::{note, FixedClock};
    use serde_json::json;

    fn workspace_with_notes(notes: Vec<Note>) -> Workspace<MemoryStore> {
        let store = MemoryStore::new().with_value("notes", serde_json::to_value(notes).unwrap());
        Workspace::mount_with(
            store,
            Box::new(FixedClock::new(5_000)),
            WorkspaceOptions::default(),
        )
        .expect("mount should succeed")
    }

    fn folder_ids(ws: &Workspace<MemoryStore>) -> Vec<String> {
        ws.folders().iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn given_default_folders_when_adding_folder_then_inserts_before_terms_and_selects_it() {
        let mut ws = workspace_with_notes(vec![]);

        let folder = ws.add_folder();

        assert_eq!(folder.name, "New Folder");
        assert_eq!(
            folder_ids(&ws),
            vec!["notes", "study", folder.id.as_str(), "terms", "images", "deleted"]
        );
        assert_eq!(ws.active_folder_id(), folder.id);
    }

    #[test]
    fn given_two_additions_when_adding_folders_then_ids_are_distinct() {
        let mut ws = workspace_with_notes(vec![]);

        let first = ws.add_folder();
        let second = ws.add_folder();

        assert_ne!(first.id, second.id);
        assert_eq!(ws.folders()[3].id, second.id);
    }

    #[test]
    fn given_added_folder_then_store_holds_full_folder_list() {
        let mut ws = workspace_with_notes(vec![]);

        ws.add_folder();

        let written = ws.store().read("folders").unwrap();
        assert_eq!(written.as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn given_folder_when_renaming_then_updates_name() {
        let mut ws = workspace_with_notes(vec![]);

        assert!(ws.rename_folder("study", "Biology"));
        assert!(!ws.rename_folder("missing", "X"));

        assert_eq!(ws.folder("study").unwrap().name, "Biology");
    }

    #[test]
    fn given_active_folder_with_notes_when_deleting_then_trashes_notes_and_falls_back() {
        let mut ws = workspace_with_notes(vec![
            note(1, "A", "study"),
            note(2, "B", "notes"),
        ]);
        assert_eq!(ws.active_folder_id(), "study");

        ws.delete_folder("study").unwrap();

        assert!(ws.folder("study").is_none());
        assert_eq!(ws.note(1).unwrap().folder_id, "deleted");
        assert_eq!(ws.note(2).unwrap().folder_id, "notes");
        assert_eq!(ws.active_folder_id(), "notes");
        assert_eq!(ws.store().read("notes").unwrap()[0]["folderId"], json!("deleted"));
    }

    #[test]
    fn given_inactive_folder_when_deleting_then_keeps_active_selection() {
        let mut ws = workspace_with_notes(vec![]);
        let extra = ws.add_folder();
        ws.select_folder("study").unwrap();

        ws.delete_folder(&extra.id).unwrap();

        assert_eq!(ws.active_folder_id(), "study");
    }

    #[test]
    fn given_system_folder_when_deleting_then_refuses() {
        let mut ws = workspace_with_notes(vec![]);

        let result = ws.delete_folder("terms");

        assert_eq!(result, Err(DomainError::SystemFolder("terms".to_string())));
        assert_eq!(ws.folders().len(), 5);
    }

    #[test]
    fn given_unknown_folder_when_deleting_then_returns_not_found() {
        let mut ws = workspace_with_notes(vec![]);

        let result = ws.delete_folder("ghost");

        assert_eq!(result, Err(DomainError::FolderNotFound("ghost".to_string())));
    }

    #[test]
    fn given_note_when_deleting_three_times_then_soft_deletes_purges_then_ignores() {
        let mut ws = workspace_with_notes(vec![note(1, "A", "study")]);

        assert_eq!(ws.delete_note(1), DeleteOutcome::SoftDeleted);
        assert_eq!(ws.note(1).unwrap().folder_id, "deleted");

        assert_eq!(ws.delete_note(1), DeleteOutcome::Purged);
        assert!(ws.note(1).is_none());

        assert_eq!(ws.delete_note(1), DeleteOutcome::Missing);
        assert!(ws.notes().is_empty());
    }

    #[test]
    fn given_active_note_when_deleting_then_clears_selection() {
        let mut ws = workspace_with_notes(vec![note(1, "A", "study")]);
        ws.select_note(1).unwrap();

        ws.delete_note(1);

        assert_eq!(ws.active_note_id(), None);
    }

    #[test]
    fn given_last_note_when_purging_then_store_holds_empty_list() {
        let mut ws = workspace_with_notes(vec![note(1, "A", "deleted")]);

        ws.delete_note(1);
        ws.process_remote_events();

        assert_eq!(ws.store().read("notes"), Some(json!([])));
        assert!(ws.notes().is_empty());
    }

    #[test]
    fn given_note_when_renaming_and_moving_then_fields_replaced() {
        let mut ws = workspace_with_notes(vec![note(1, "A", "study")]);

        assert!(ws.rename_note(1, "Cell cycle"));
        assert!(ws.move_note(1, "notes"));
        assert!(!ws.move_note(42, "notes"));

        let moved = ws.note(1).unwrap();
        assert_eq!(moved.title, "Cell cycle");
        assert_eq!(moved.folder_id, "notes");
    }

    #[test]
    fn given_note_when_updating_content_then_refreshes_preview() {
        let mut ws = workspace_with_notes(vec![note(1, "A", "study")]);

        ws.update_note_content(1, "<p>Mitosis &amp; meiosis</p>");

        let updated = ws.note(1).unwrap();
        assert_eq!(updated.content, "<p>Mitosis &amp; meiosis</p>");
        assert_eq!(updated.preview, "Mitosis & meiosis...");
    }
}
