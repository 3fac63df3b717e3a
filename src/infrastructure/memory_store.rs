// src/infrastructure/memory_store.rs
use crate::application::{Listener, RemoteStore, Subscription};
use crate::domain::DomainError;
use crate::infrastructure::listeners::{normalize, notify, ListenerRegistry};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

#[derive(Default)]
struct Inner {
    values: HashMap<String, Value>,
    listeners: ListenerRegistry,
}

/// In-process document store.
///
/// Clones share one tree, so two workspaces mounted on clones of the same
/// store behave like two clients of one remote database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without notifying anyone
    pub fn with_value(self, path: &str, value: Value) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.values.insert(path.to_string(), value);
        }
        self
    }

    pub fn read(&self, path: &str) -> Option<Value> {
        self.lock()
            .ok()
            .and_then(|inner| inner.values.get(path).cloned())
    }

    pub fn listener_count(&self, path: &str) -> usize {
        self.lock().map_or(0, |inner| inner.listeners.count(path))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DomainError> {
        self.inner
            .lock()
            .map_err(|e| DomainError::StoreError(format!("Store lock poisoned: {}", e)))
    }
}

impl RemoteStore for MemoryStore {
    #[instrument(level = "debug", skip(self, listener))]
    fn subscribe(&self, path: &str, listener: Listener) -> Result<Subscription, DomainError> {
        let (id, listener, current) = {
            let mut inner = self.lock()?;
            let (id, listener) = inner.listeners.register(path, listener);
            (id, listener, inner.values.get(path).and_then(normalize))
        };
        listener(current);

        let weak = Arc::downgrade(&self.inner);
        let path = path.to_string();
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut inner) = inner.lock() {
                    inner.listeners.remove(&path, id);
                    debug!(path = %path, id, "Listener removed");
                }
            }
        }))
    }

    #[instrument(level = "debug", skip(self, value))]
    fn write(&self, path: &str, value: &Value) -> Result<(), DomainError> {
        let listeners = {
            let mut inner = self.lock()?;
            if value.is_null() {
                inner.values.remove(path);
            } else {
                inner.values.insert(path.to_string(), value.clone());
            }
            inner.listeners.listeners(path)
        };
        notify(&listeners, value);
        Ok(())
    }
}
