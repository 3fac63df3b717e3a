// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to the store file (optional)
    #[arg(short, long, value_name = "STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Path to a TOML config file (optional)
    #[arg(long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List folders in display order
    Folders,

    /// Create, rename or delete a folder
    Folder {
        #[command(subcommand)]
        action: FolderCommand,
    },

    /// List notes with ID, title and preview
    Notes {
        /// Only notes in this folder
        #[arg(short, long, value_name = "FOLDER_ID")]
        folder: Option<String>,

        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show, view, rename, move or delete a note
    Note {
        #[command(subcommand)]
        action: NoteCommand,
    },

    /// Import documents (.docx, .md, .html, .txt) as notes
    Import {
        /// Path to a document or directory
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Target folder (defaults to the active folder)
        #[arg(short, long, value_name = "FOLDER_ID")]
        folder: Option<String>,

        /// Process directory recursively
        #[arg(short, long)]
        recursive: bool,
    },

    /// Manage the term dictionary
    Term {
        #[command(subcommand)]
        action: TermCommand,
    },

    /// Manage the image gallery
    Image {
        #[command(subcommand)]
        action: ImageCommand,
    },

    /// Annotate a note interactively (reads commands from stdin)
    Annotate {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FolderCommand {
    /// Add a custom folder
    Add {
        /// Name instead of "New Folder"
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },
    Rename {
        #[arg(value_name = "FOLDER_ID")]
        id: String,
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Delete a custom folder; its notes move to the trash
    Delete {
        #[arg(value_name = "FOLDER_ID")]
        id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoteCommand {
    /// Print a note
    Show {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        /// Output note as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open a note with its term definitions in the browser
    View {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },
    Rename {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
        #[arg(value_name = "TITLE")]
        title: String,
    },
    Move {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
        #[arg(value_name = "FOLDER_ID")]
        folder: String,
    },
    /// Move a note to the trash, or purge it if already trashed
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TermCommand {
    /// List terms, optionally filtered by term or definition text
    List {
        #[arg(value_name = "SEARCH")]
        search: Option<String>,
    },
    /// Show all definitions of a term
    Show {
        #[arg(value_name = "TERM")]
        term: String,
    },
    /// Add a text definition
    Add {
        #[arg(value_name = "TERM")]
        term: String,
        #[arg(value_name = "TEXT")]
        text: String,

        /// Note the definition comes from
        #[arg(short, long, value_name = "NOTE_ID")]
        note: Option<i64>,
    },
    /// Add a gallery image as a definition
    AddImage {
        #[arg(value_name = "TERM")]
        term: String,
        #[arg(value_name = "IMAGE_ID")]
        image_id: i64,

        /// Note the definition comes from
        #[arg(short, long, value_name = "NOTE_ID")]
        note: Option<i64>,
    },
    /// Delete one definition of a term
    Delete {
        #[arg(value_name = "TERM")]
        term: String,
        #[arg(value_name = "DEFINITION_ID")]
        definition_id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ImageCommand {
    List,
    /// Upload an image file
    Add {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    Delete {
        #[arg(value_name = "IMAGE_ID")]
        image_id: i64,
    },
}
