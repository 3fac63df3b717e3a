use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use termnote::application::{Workspace, WorkspaceOptions};
use termnote::infrastructure::{JsonFileStore, MemoryStore};
use termnote::util::testing::FixedClock;

/// Store file in a temporary directory
#[allow(dead_code)]
pub struct TestStore {
    _temp_dir: TempDir,
    pub store_path: PathBuf,
}

impl TestStore {
    /// Empty store file
    #[allow(dead_code)]
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let store_path = temp_dir.path().join("store.json");
        Ok(Self {
            _temp_dir: temp_dir,
            store_path,
        })
    }

    /// Store file seeded with the golden notes
    #[allow(dead_code)]
    pub fn seeded() -> Result<Self> {
        let test_store = Self::new()?;
        let document = json!({ "notes": golden_notes() });
        std::fs::write(&test_store.store_path, serde_json::to_string_pretty(&document)?)
            .context("Failed to write store fixture")?;
        Ok(test_store)
    }

    #[allow(dead_code)]
    pub fn open(&self) -> Result<JsonFileStore> {
        JsonFileStore::open(&self.store_path)
    }

    #[allow(dead_code)]
    pub fn mount(&self) -> Result<Workspace<JsonFileStore>> {
        Ok(Workspace::mount_with(
            self.open()?,
            Box::new(FixedClock::new(test_notes::NOW)),
            WorkspaceOptions::default(),
        )?)
    }
}

/// Workspace on an in-memory store seeded with the golden notes
#[allow(dead_code)]
pub fn memory_workspace() -> Result<(MemoryStore, Workspace<MemoryStore>)> {
    let store = MemoryStore::new().with_value("notes", golden_notes());
    let workspace = mount_memory(store.clone(), test_notes::NOW)?;
    Ok((store, workspace))
}

/// Mount another client on `store` with its own clock
#[allow(dead_code)]
pub fn mount_memory(store: MemoryStore, now: i64) -> Result<Workspace<MemoryStore>> {
    Ok(Workspace::mount_with(
        store,
        Box::new(FixedClock::new(now)),
        WorkspaceOptions::default(),
    )?)
}

fn golden_notes() -> serde_json::Value {
    json!([
        {
            "id": test_notes::BIO1,
            "title": "Bio1",
            "content": "<p>ATP is the energy currency of the cell.</p>",
            "preview": "ATP is the energy currency of the cell.",
            "time": "09:15",
            "folderId": "study"
        },
        {
            "id": test_notes::PHOTOSYNTHESIS,
            "title": "Photosynthesis",
            "content": "<p>Chloroplasts make ATP from light.</p>",
            "preview": "Chloroplasts make ATP from light.",
            "time": "10:02",
            "folderId": "study"
        },
        {
            "id": test_notes::SHOPPING,
            "title": "Shopping",
            "content": "<p>milk, eggs</p>",
            "preview": "milk, eggs",
            "time": "11:40",
            "folderId": "notes"
        }
    ])
}

/// Known note IDs of the golden dataset
#[allow(dead_code)]
pub mod test_notes {
    pub const BIO1: i64 = 1_700_000_000_001;
    pub const PHOTOSYNTHESIS: i64 = 1_700_000_000_002;
    pub const SHOPPING: i64 = 1_700_000_000_003;

    // Clock of the mounted workspace, later than every golden id
    pub const NOW: i64 = 1_700_000_100_000;

    // For testing error cases
    pub const NONEXISTENT: i64 = 999_999_999;
}
