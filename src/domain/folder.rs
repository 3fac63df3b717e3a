// src/domain/folder.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    System,
    Custom,
}

/// The fixed folders every workspace carries, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemFolder {
    Notes,
    Terms,
    Images,
    Deleted,
}

impl SystemFolder {
    /// Folders placed before the custom block
    pub const LEADING: [SystemFolder; 1] = [SystemFolder::Notes];
    /// Folders placed after the custom block
    pub const TRAILING: [SystemFolder; 3] =
        [SystemFolder::Terms, SystemFolder::Images, SystemFolder::Deleted];

    pub fn id(self) -> &'static str {
        match self {
            SystemFolder::Notes => "notes",
            SystemFolder::Terms => "terms",
            SystemFolder::Images => "images",
            SystemFolder::Deleted => "deleted",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SystemFolder::Notes => "Notes",
            SystemFolder::Terms => "Terms",
            SystemFolder::Images => "Images",
            SystemFolder::Deleted => "Recently Deleted",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SystemFolder::Notes => "FileText",
            SystemFolder::Terms => "Book",
            SystemFolder::Images => "Camera",
            SystemFolder::Deleted => "Trash2",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::LEADING
            .iter()
            .chain(Self::TRAILING.iter())
            .copied()
            .find(|folder| folder.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FolderKind,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    "Folder".to_string()
}

impl Folder {
    pub fn system(folder: SystemFolder) -> Self {
        Self {
            id: folder.id().to_string(),
            name: folder.display_name().to_string(),
            kind: FolderKind::System,
            icon: folder.icon().to_string(),
        }
    }

    pub fn custom(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: FolderKind::Custom,
            icon: default_icon(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.kind == FolderKind::System
    }

    /// Which registry entry this folder stands for, if it is a system folder
    pub fn system_tag(&self) -> Option<SystemFolder> {
        match self.kind {
            FolderKind::System => SystemFolder::from_id(&self.id),
            FolderKind::Custom => None,
        }
    }
}

/// Build the canonical folder list `[Notes, ...custom, Terms, Images, Deleted]`
/// around the given custom folders. Any system folders among the input are
/// discarded and replaced by the registry entries.
pub fn reconcile(folders: &[Folder]) -> Vec<Folder> {
    let custom = folders
        .iter()
        .filter(|f| f.kind == FolderKind::Custom)
        .cloned();

    SystemFolder::LEADING
        .iter()
        .map(|s| Folder::system(*s))
        .chain(custom)
        .chain(SystemFolder::TRAILING.iter().map(|s| Folder::system(*s)))
        .collect()
}

/// Folder list written to an empty store
pub fn default_folders() -> Vec<Folder> {
    reconcile(&[Folder::custom(
        crate::constants::DEFAULT_CUSTOM_FOLDER_ID,
        crate::constants::DEFAULT_CUSTOM_FOLDER_NAME,
    )])
}

/// Position at which a new custom folder goes: right after the last custom
/// folder, before the trailing system block.
pub fn custom_insert_position(folders: &[Folder]) -> usize {
    folders
        .iter()
        .position(|f| {
            f.system_tag()
                .is_some_and(|tag| SystemFolder::TRAILING.contains(&tag))
        })
        .unwrap_or(folders.len())
}
