// src/infrastructure/file_store.rs
use crate::application::{Listener, RemoteStore, Subscription};
use crate::domain::DomainError;
use crate::infrastructure::listeners::{normalize, notify, ListenerRegistry};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// Document store persisted as a single JSON object on disk.
///
/// Each top-level key is one collection path. Writes rewrite the whole file
/// through a temp file and rename. Listeners are in-process only.
pub struct JsonFileStore {
    path: PathBuf,
    listeners: Arc<Mutex<ListenerRegistry>>,
}

impl JsonFileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = PathBuf::from(path.as_ref());
        debug!(?path, "Opening JsonFileStore");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory {}", parent.display())
            })?;
        }

        let store = Self {
            path,
            listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
        };

        if store.path.exists() {
            store
                .read_document()
                .with_context(|| format!("Store file is not valid: {}", store.path.display()))?;
        } else {
            store
                .write_document(&Map::new())
                .context("Failed to initialize store file")?;
            info!(path = ?store.path, "Created empty store");
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self, path: &str) -> Result<Option<Value>, DomainError> {
        Ok(self.read_document()?.get(path).and_then(normalize))
    }

    fn read_document(&self) -> Result<Map<String, Value>, DomainError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            DomainError::StoreError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(DomainError::StoreError(
                "Store root must be a JSON object".to_string(),
            )),
            Err(e) => Err(DomainError::StoreError(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), DomainError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        serde_json::to_writer_pretty(&mut temp, document).map_err(|e| self.write_error(e))?;
        temp.flush().map_err(|e| self.write_error(e))?;
        temp.persist(&self.path).map_err(|e| self.write_error(e))?;
        Ok(())
    }

    fn write_error(&self, e: impl std::fmt::Display) -> DomainError {
        DomainError::StoreError(format!("Failed to write {}: {}", self.path.display(), e))
    }

    fn registry(&self) -> Result<std::sync::MutexGuard<'_, ListenerRegistry>, DomainError> {
        self.listeners
            .lock()
            .map_err(|e| DomainError::StoreError(format!("Listener lock poisoned: {}", e)))
    }
}

impl RemoteStore for JsonFileStore {
    #[instrument(level = "debug", skip(self, listener))]
    fn subscribe(&self, path: &str, listener: Listener) -> Result<Subscription, DomainError> {
        let current = self.read(path)?;
        let (id, listener) = self.registry()?.register(path, listener);
        listener(current);

        let weak = Arc::downgrade(&self.listeners);
        let path = path.to_string();
        Ok(Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                if let Ok(mut registry) = registry.lock() {
                    registry.remove(&path, id);
                }
            }
        }))
    }

    #[instrument(level = "debug", skip(self, value))]
    fn write(&self, path: &str, value: &Value) -> Result<(), DomainError> {
        let mut document = self.read_document()?;
        if value.is_null() {
            document.remove(path);
        } else {
            document.insert(path.to_string(), value.clone());
        }
        self.write_document(&document)?;

        let listeners = self.registry()?.listeners(path);
        notify(&listeners, value);
        Ok(())
    }
}
