// src/constants.rs
//
// Application-wide constants. Each constant is documented with its purpose
// and usage context.

/// Remote path of the notes collection.
pub const NOTES_PATH: &str = "notes";

/// Remote path of the folder list.
pub const FOLDERS_PATH: &str = "folders";

/// Remote path of the term dictionary.
pub const EXPLANATIONS_PATH: &str = "explanations";

/// Remote path of the image gallery.
pub const IMAGES_PATH: &str = "images";

/// Id and name of the custom folder seeded into an empty store.
///
/// Used in: `domain/folder.rs`
pub const DEFAULT_CUSTOM_FOLDER_ID: &str = "study";
pub const DEFAULT_CUSTOM_FOLDER_NAME: &str = "..study";

/// Name given to folders created with `add_folder`.
///
/// Used in: `application/organizer.rs`
pub const NEW_FOLDER_NAME: &str = "New Folder";

/// Number of plain-text characters kept in a note preview before the ellipsis.
///
/// Used in: `util/text.rs`, `infrastructure/config.rs`
pub const PREVIEW_CHAR_LIMIT: usize = 50;

/// Source recorded on a definition created while no note is open.
///
/// Used in: `application/workspace.rs`, `infrastructure/config.rs`
pub const UNKNOWN_SOURCE: &str = "Unknown Note";

/// Delay in milliseconds after writing the HTML file before opening the browser.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 200;
