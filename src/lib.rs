// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::application::{RemoteStore, Workspace};
use crate::cli::args::{Args, Command, NoteCommand};
use crate::cli::handlers;
use crate::infrastructure::{BrowserRenderer, Config, JsonFileStore, SystemClock};
use anyhow::{bail, Result};
use tracing::{debug, info};

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting termnote with arguments");

    // Initialize infrastructure
    let config = Config::discover(args.config.as_deref())?;
    let store_path = config.resolve_store_path(args.store.as_deref())?;
    debug!(?store_path, "Using store");
    let store = JsonFileStore::open(&store_path)?;

    // Initialize application
    let mut workspace = Workspace::mount_with(store, Box::new(SystemClock), config.workspace_options())?;

    // Execute use case
    let mut stdout = std::io::stdout().lock();
    match args.command {
        Command::Note {
            action: NoteCommand::View { note_id },
        } => view_note(&workspace, note_id)?,
        Command::Annotate { note_id } => {
            info!(note_id, "Annotating note");
            let mut stdin = std::io::stdin().lock();
            handlers::annotate(&mut workspace, note_id, &mut stdin, &mut stdout)?;
        }
        command => handlers::execute(&mut workspace, command, &mut stdout)?,
    }

    check_sync(&workspace)
}

fn view_note<S: RemoteStore>(workspace: &Workspace<S>, note_id: i64) -> Result<()> {
    info!(note_id, "Viewing note");
    let (title, html) = handlers::render_note(workspace, note_id)?;

    // Create temporary file and open in browser
    let mut renderer = BrowserRenderer::new();
    let temp_path = renderer.create_temp_file(&title, &html)?;
    renderer.open_in_browser(&temp_path)?;
    Ok(())
}

/// Local state is kept on failed writes, but the command must not look successful
fn check_sync<S: RemoteStore>(workspace: &Workspace<S>) -> Result<()> {
    let status = workspace.sync_status();
    if status.is_clean() {
        return Ok(());
    }
    bail!(
        "{} write(s) to the store failed: {}",
        status.failed_writes(),
        status.last_error().unwrap_or("unknown error")
    )
}
