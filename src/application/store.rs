// src/application/store.rs
use crate::domain::DomainError;
use serde_json::Value;

/// Callback receiving the value at a path: once on attach, then after every
/// write. `None` means the path holds nothing.
pub type Listener = Box<dyn Fn(Option<Value>) + Send + Sync>;

/// Tree-shaped document store with whole-value writes and change listeners.
///
/// There is no merge: `write` replaces everything at `path`, and the last
/// writer wins.
pub trait RemoteStore {
    fn subscribe(&self, path: &str, listener: Listener) -> Result<Subscription, DomainError>;

    fn write(&self, path: &str, value: &Value) -> Result<(), DomainError>;
}

/// Handle of a registered listener. The listener is removed when the handle
/// is dropped or `unsubscribe` is called.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// True when a snapshot carries no data: absent, null, `[]` or `{}`
pub fn is_empty_snapshot(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}
