// src/application/workspace.rs
use crate::application::store::is_empty_snapshot;
use crate::application::{Clock, CollectionPath, RemoteEvent, RemoteStore, Subscription, SyncStatus};
use crate::constants::{DEFAULT_CUSTOM_FOLDER_ID, PREVIEW_CHAR_LIMIT, UNKNOWN_SOURCE};
use crate::domain::folder::{default_folders, reconcile};
use crate::domain::{Dictionary, DomainError, Folder, IdGenerator, Image, Note};
use crate::infrastructure::clock::SystemClock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, info, instrument, warn};

/// Tunables of a workspace, usually taken from the config file
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceOptions {
    /// Folder selected when the workspace is mounted
    pub default_folder: String,
    /// Source recorded on definitions created with no note open
    pub unknown_source: String,
    /// Characters kept in note previews
    pub preview_chars: usize,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            default_folder: DEFAULT_CUSTOM_FOLDER_ID.to_string(),
            unknown_source: UNKNOWN_SOURCE.to_string(),
            preview_chars: PREVIEW_CHAR_LIMIT,
        }
    }
}

/// Owner of the four collections and the current selection.
///
/// Local state is authoritative for the UI and is mirrored to the store by
/// overwriting the whole collection after every mutation. Store snapshots are
/// queued by the subscription callbacks and applied in
/// [`Workspace::process_remote_events`].
pub struct Workspace<S: RemoteStore> {
    store: S,
    clock: Box<dyn Clock>,
    ids: IdGenerator,
    pub(crate) options: WorkspaceOptions,
    pub(crate) notes: Vec<Note>,
    pub(crate) folders: Vec<Folder>,
    pub(crate) dictionary: Dictionary,
    pub(crate) images: Vec<Image>,
    pub(crate) active_folder_id: String,
    pub(crate) active_note_id: Option<i64>,
    events: Receiver<RemoteEvent>,
    subscriptions: Vec<Subscription>,
    sync_status: SyncStatus,
}

impl<S: RemoteStore> Workspace<S> {
    pub fn mount(store: S) -> Result<Self, DomainError> {
        Self::mount_with(store, Box::new(SystemClock), WorkspaceOptions::default())
    }

    /// Subscribe to every collection path and apply the initial snapshots
    #[instrument(level = "debug", skip(store, clock))]
    pub fn mount_with(
        store: S,
        clock: Box<dyn Clock>,
        options: WorkspaceOptions,
    ) -> Result<Self, DomainError> {
        let (sender, events) = mpsc::channel();
        let mut workspace = Self {
            store,
            clock,
            ids: IdGenerator::new(),
            active_folder_id: options.default_folder.clone(),
            options,
            notes: Vec::new(),
            folders: default_folders(),
            dictionary: Dictionary::new(),
            images: Vec::new(),
            active_note_id: None,
            events,
            subscriptions: Vec::new(),
            sync_status: SyncStatus::default(),
        };

        for path in CollectionPath::ALL {
            let sender = sender.clone();
            let subscription = workspace.store.subscribe(
                path.as_str(),
                Box::new(move |value| {
                    // Receiver gone means the workspace was dropped
                    let _ = sender.send(RemoteEvent { path, value });
                }),
            )?;
            workspace.subscriptions.push(subscription);
        }

        let applied = workspace.process_remote_events();
        info!(applied, "Workspace mounted");
        Ok(workspace)
    }

    /// Release all subscriptions and hand the store back
    pub fn unmount(mut self) -> S {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        debug!("Workspace unmounted");
        self.store
    }

    /// Apply every queued store snapshot. Returns how many were applied.
    pub fn process_remote_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply_remote(event);
            applied += 1;
        }
        applied
    }

    fn apply_remote(&mut self, event: RemoteEvent) {
        let RemoteEvent { path, value } = event;

        match path {
            CollectionPath::Folders => self.apply_remote_folders(value),
            CollectionPath::Notes => {
                if let Some(notes) = guarded(path, value) {
                    self.notes = notes;
                }
            }
            CollectionPath::Explanations => {
                if let Some(dictionary) = guarded(path, value) {
                    self.dictionary = dictionary;
                }
            }
            CollectionPath::Images => {
                if let Some(images) = guarded(path, value) {
                    self.images = images;
                }
            }
        }
    }

    fn apply_remote_folders(&mut self, value: Option<Value>) {
        match value.filter(|v| !is_empty_snapshot(Some(v))) {
            None => {
                info!("Folder list empty, seeding defaults");
                self.folders = default_folders();
                self.persist(CollectionPath::Folders);
            }
            Some(value) => {
                if let Some(entries) = decode::<Vec<Value>>(CollectionPath::Folders, value) {
                    self.folders = reconcile(&custom_folders(entries));
                    debug!(count = self.folders.len(), "Reconciled folder list");
                }
            }
        }
    }

    /// Overwrite the whole collection at `path` with local state.
    ///
    /// Failures are logged and recorded in [`SyncStatus`]; local state is kept.
    pub(crate) fn persist(&mut self, path: CollectionPath) {
        let encoded = match path {
            CollectionPath::Notes => serde_json::to_value(&self.notes),
            CollectionPath::Folders => serde_json::to_value(&self.folders),
            CollectionPath::Explanations => serde_json::to_value(&self.dictionary),
            CollectionPath::Images => serde_json::to_value(&self.images),
        };

        let result = encoded
            .map_err(|e| DomainError::StoreError(format!("Failed to encode {}: {}", path, e)))
            .and_then(|value| self.store.write(path.as_str(), &value));

        match result {
            Ok(()) => debug!(%path, "Collection written"),
            Err(e) => {
                warn!(%path, error = %e, "Write failed, local state kept");
                self.sync_status.record_failure(path, &e);
            }
        }
    }

    pub(crate) fn next_id(&mut self) -> i64 {
        let now = self.clock.now_millis();
        self.ids.next(now)
    }

    pub(crate) fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub(crate) fn display_time(&self) -> String {
        self.clock.display_time()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &WorkspaceOptions {
        &self.options
    }

    pub fn sync_status(&self) -> &SyncStatus {
        &self.sync_status
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn notes_in_folder<'a>(&'a self, folder_id: &'a str) -> impl Iterator<Item = &'a Note> {
        self.notes.iter().filter(move |n| n.folder_id == folder_id)
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn active_folder_id(&self) -> &str {
        &self.active_folder_id
    }

    pub fn active_note_id(&self) -> Option<i64> {
        self.active_note_id
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.active_note_id.and_then(|id| self.note(id))
    }

    pub fn select_folder(&mut self, id: &str) -> Result<(), DomainError> {
        if self.folder(id).is_none() {
            return Err(DomainError::FolderNotFound(id.to_string()));
        }
        self.active_folder_id = id.to_string();
        Ok(())
    }

    pub fn select_note(&mut self, id: i64) -> Result<(), DomainError> {
        if self.note(id).is_none() {
            return Err(DomainError::NoteNotFound(id));
        }
        self.active_note_id = Some(id);
        Ok(())
    }

    pub fn clear_note_selection(&mut self) {
        self.active_note_id = None;
    }
}

/// Decode a snapshot unless it is empty; an empty snapshot never blanks local state
fn guarded<T: DeserializeOwned>(path: CollectionPath, value: Option<Value>) -> Option<T> {
    match value.filter(|v| !is_empty_snapshot(Some(v))) {
        Some(value) => decode(path, value),
        None => {
            debug!(%path, "Ignoring empty snapshot");
            None
        }
    }
}

/// Entries typed `custom` that decode as folders; everything else is dropped
fn custom_folders(entries: Vec<Value>) -> Vec<Folder> {
    entries
        .into_iter()
        .filter(|entry| entry.get("type").and_then(Value::as_str) == Some("custom"))
        .filter_map(|entry| match serde_json::from_value::<Folder>(entry) {
            Ok(folder) => Some(folder),
            Err(e) => {
                debug!(error = %e, "Skipping malformed folder entry");
                None
            }
        })
        .collect()
}

fn decode<T: DeserializeOwned>(path: CollectionPath, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => {
            debug!(%path, "Applied remote snapshot");
            Some(decoded)
        }
        Err(e) => {
            warn!(%path, error = %e, "Ignoring undecodable snapshot");
            None
        }
    }
}
