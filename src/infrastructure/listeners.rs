// src/infrastructure/listeners.rs
use crate::application::Listener;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub type SharedListener = Arc<dyn Fn(Option<Value>) + Send + Sync>;

/// Path-keyed listener table shared by the store adapters
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    by_path: HashMap<String, Vec<(u64, SharedListener)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; returns its id and a handle for the initial call
    pub fn register(&mut self, path: &str, listener: Listener) -> (u64, SharedListener) {
        self.next_id += 1;
        let id = self.next_id;
        let shared: SharedListener = Arc::from(listener);
        self.by_path
            .entry(path.to_string())
            .or_default()
            .push((id, Arc::clone(&shared)));
        (id, shared)
    }

    pub fn remove(&mut self, path: &str, id: u64) {
        if let Some(entries) = self.by_path.get_mut(path) {
            entries.retain(|(entry_id, _)| *entry_id != id);
            if entries.is_empty() {
                self.by_path.remove(path);
            }
        }
    }

    /// Snapshot of the listeners on `path`, to be called outside any lock
    pub fn listeners(&self, path: &str) -> Vec<SharedListener> {
        self.by_path
            .get(path)
            .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default()
    }

    pub fn count(&self, path: &str) -> usize {
        self.by_path.get(path).map_or(0, Vec::len)
    }
}

/// Deliver `value` to each listener. Null is delivered as `None`.
pub fn notify(listeners: &[SharedListener], value: &Value) {
    for listener in listeners {
        listener(normalize(value));
    }
}

pub fn normalize(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other.clone()),
    }
}
