// src/util/testing.rs

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{Clock, Listener, RemoteStore, Subscription};
use crate::domain::{DomainError, Note};

/// Store double that serves fixed snapshots and records every write.
///
/// Listeners get the seeded value on attach and are never called again, so
/// tests see exactly what the workspace pushed upstream.
///
/// # Examples
///
/// ```
/// use termnote::util::testing::MockRemoteStore;
/// use termnote::application::RemoteStore;
/// use serde_json::json;
///
/// let store = MockRemoteStore::builder()
///     .with_value("notes", json!([]))
///     .build();
/// store.write("images", &json!([])).unwrap();
///
/// assert_eq!(store.writes().len(), 1);
/// ```
pub struct MockRemoteStore {
    values: HashMap<String, Value>,
    fail_writes: bool,
    writes: Mutex<Vec<(String, Value)>>,
}

impl MockRemoteStore {
    pub fn builder() -> MockRemoteStoreBuilder {
        MockRemoteStoreBuilder::new()
    }

    /// Every accepted or rejected write, in order
    pub fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Last value written to `path`
    pub fn last_write(&self, path: &str) -> Option<Value> {
        self.writes()
            .into_iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, v)| v)
    }
}

impl RemoteStore for MockRemoteStore {
    fn subscribe(&self, path: &str, listener: Listener) -> Result<Subscription, DomainError> {
        listener(self.values.get(path).cloned());
        Ok(Subscription::new(|| {}))
    }

    fn write(&self, path: &str, value: &Value) -> Result<(), DomainError> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((path.to_string(), value.clone()));
        }
        if self.fail_writes {
            return Err(DomainError::StoreError(format!("write to {} rejected", path)));
        }
        Ok(())
    }
}

/// Builder for MockRemoteStore
pub struct MockRemoteStoreBuilder {
    values: HashMap<String, Value>,
    fail_writes: bool,
}

impl MockRemoteStoreBuilder {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            fail_writes: false,
        }
    }

    /// Snapshot delivered to listeners of `path` on attach
    pub fn with_value(mut self, path: &str, value: Value) -> Self {
        self.values.insert(path.to_string(), value);
        self
    }

    /// Make every write fail with a store error
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn build(self) -> MockRemoteStore {
        MockRemoteStore {
            values: self.values,
            fail_writes: self.fail_writes,
            writes: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MockRemoteStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock frozen at `millis`, showing "12:34"
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    millis: i64,
}

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self { millis }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis
    }

    fn display_time(&self) -> String {
        "12:34".to_string()
    }
}

/// Minimal note for fixtures
pub fn note(id: i64, title: &str, folder_id: &str) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: String::new(),
        preview: String::new(),
        time: "12:34".to_string(),
        folder_id: folder_id.to_string(),
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["zip", "roxmltree", "pulldown_cmark"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
