// src/cli/handlers.rs
use crate::application::{
    AnnotationEffect, AnnotationSession, DeleteOutcome, GalleryAction, GalleryMode, GalleryView,
    ImageSource, ImportSource, Popup, PopupContent, RemoteStore, Workspace,
};
use crate::cli::args::{Command, FolderCommand, ImageCommand, NoteCommand, TermCommand};
use crate::domain::definition::term_key;
use crate::domain::{DefinitionPayload, DomainError, Note};
use crate::infrastructure::converters::{converter_for, is_supported};
use crate::ports::{annotate_terms, toggle_highlight, HtmlPresenter, TextRange};
use crate::util::text::plain_text;
use anyhow::{bail, Context, Result};
use chrono::DateTime;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Run every command except `note view` and `annotate`, which need a browser
/// or an interactive terminal.
pub fn execute<S: RemoteStore>(ws: &mut Workspace<S>, command: Command, out: &mut dyn Write) -> Result<()> {
    debug!(?command, "Executing command");
    match command {
        Command::Folders => list_folders(ws, out),
        Command::Folder { action } => handle_folder(ws, action, out),
        Command::Notes { folder, json } => list_notes(ws, folder.as_deref(), json, out),
        Command::Note { action } => handle_note(ws, action, out),
        Command::Import {
            path,
            folder,
            recursive,
        } => handle_import(ws, &path, folder.as_deref(), recursive, out),
        Command::Term { action } => handle_term(ws, action, out),
        Command::Image { action } => handle_image(ws, action, out),
        Command::Annotate { .. } => bail!("annotate needs an interactive session"),
    }
}

fn list_folders<S: RemoteStore>(ws: &Workspace<S>, out: &mut dyn Write) -> Result<()> {
    for folder in ws.folders() {
        let kind = if folder.is_system() { "system" } else { "custom" };
        writeln!(out, "{}\t{}\t{}", folder.id, folder.name, kind)?;
    }
    Ok(())
}

fn handle_folder<S: RemoteStore>(ws: &mut Workspace<S>, action: FolderCommand, out: &mut dyn Write) -> Result<()> {
    match action {
        FolderCommand::Add { name } => {
            let mut folder = ws.add_folder();
            if let Some(name) = name {
                ws.rename_folder(&folder.id, &name);
                folder.name = name;
            }
            writeln!(out, "Added folder {}\t{}", folder.id, folder.name)?;
        }
        FolderCommand::Rename { id, name } => {
            if !ws.rename_folder(&id, &name) {
                return Err(DomainError::FolderNotFound(id).into());
            }
            writeln!(out, "Renamed folder {}", id)?;
        }
        FolderCommand::Delete { id } => {
            ws.delete_folder(&id)?;
            writeln!(out, "Deleted folder {}", id)?;
        }
    }
    Ok(())
}

fn list_notes<S: RemoteStore>(
    ws: &Workspace<S>,
    folder: Option<&str>,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if let Some(id) = folder {
        if ws.folder(id).is_none() {
            return Err(DomainError::FolderNotFound(id.to_string()).into());
        }
    }
    let notes: Vec<&Note> = ws
        .notes()
        .iter()
        .filter(|n| folder.map_or(true, |id| n.folder_id == id))
        .collect();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&notes)?)?;
        return Ok(());
    }
    for note in notes {
        writeln!(out, "{}\t{}\t{}", note.id, note.title, note.preview)?;
    }
    Ok(())
}

fn handle_note<S: RemoteStore>(ws: &mut Workspace<S>, action: NoteCommand, out: &mut dyn Write) -> Result<()> {
    match action {
        NoteCommand::Show { note_id, json } => {
            let note = ws.note(note_id).ok_or(DomainError::NoteNotFound(note_id))?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(note)?)?;
            } else {
                writeln!(out, "{}", note.title)?;
                writeln!(out, "Folder: {}  Time: {}", note.folder_id, note.time)?;
                writeln!(out)?;
                writeln!(out, "{}", plain_text(&note.content))?;
            }
        }
        NoteCommand::View { note_id } => {
            bail!("note view {} needs a browser", note_id)
        }
        NoteCommand::Rename { note_id, title } => {
            if !ws.rename_note(note_id, &title) {
                return Err(DomainError::NoteNotFound(note_id).into());
            }
            writeln!(out, "Renamed note {}", note_id)?;
        }
        NoteCommand::Move { note_id, folder } => {
            if ws.folder(&folder).is_none() {
                return Err(DomainError::FolderNotFound(folder).into());
            }
            if !ws.move_note(note_id, &folder) {
                return Err(DomainError::NoteNotFound(note_id).into());
            }
            writeln!(out, "Moved note {} to {}", note_id, folder)?;
        }
        NoteCommand::Delete { note_id } => match ws.delete_note(note_id) {
            DeleteOutcome::SoftDeleted => writeln!(out, "Moved note {} to trash", note_id)?,
            DeleteOutcome::Purged => writeln!(out, "Deleted note {} permanently", note_id)?,
            DeleteOutcome::Missing => return Err(DomainError::NoteNotFound(note_id).into()),
        },
    }
    Ok(())
}

/// Standalone HTML page of a note with its term definitions
pub fn render_note<S: RemoteStore>(ws: &Workspace<S>, note_id: i64) -> Result<(String, String)> {
    let note = ws.note(note_id).ok_or(DomainError::NoteNotFound(note_id))?;
    let html = HtmlPresenter::new().render(note, ws.dictionary());
    Ok((note.title.clone(), html))
}

fn handle_import<S: RemoteStore>(
    ws: &mut Workspace<S>,
    path: &Path,
    folder: Option<&str>,
    recursive: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if path.is_file() {
        let note = import_file(ws, path, folder)?;
        writeln!(out, "Imported {}\t{}", note.id, note.title)?;
        return Ok(());
    }
    if !path.is_dir() {
        bail!("Path does not exist: {}", path.display());
    }

    let mut imported = 0;
    let mut failed = 0;
    for file in document_files(path, recursive) {
        match import_file(ws, &file, folder) {
            Ok(note) => {
                imported += 1;
                writeln!(out, "Imported {}\t{}", note.id, note.title)?;
            }
            Err(e) => {
                failed += 1;
                warn!(path = %file.display(), error = %e, "Import failed");
                writeln!(out, "Failed {}: {:#}", file.display(), e)?;
            }
        }
    }
    info!(imported, failed, "Directory import finished");
    writeln!(out, "Imported {} document(s), {} failed", imported, failed)?;
    Ok(())
}

fn document_files(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let walker = walkdir::WalkDir::new(dir).follow_links(false).sort_by_file_name();
    let walker = if recursive { walker } else { walker.max_depth(1) };
    walker
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_supported(p))
        .collect()
}

fn import_file<S: RemoteStore>(ws: &mut Workspace<S>, path: &Path, folder: Option<&str>) -> Result<Note> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Import path has no file name")?;
    let converter = converter_for(&file_name)?;
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let source = ImportSource { file_name, bytes };
    Ok(ws.import_document(&source, folder, converter.as_ref())?)
}

fn handle_term<S: RemoteStore>(ws: &mut Workspace<S>, action: TermCommand, out: &mut dyn Write) -> Result<()> {
    match action {
        TermCommand::List { search } => {
            let terms: Vec<&str> = match &search {
                Some(query) => ws.dictionary().search(query),
                None => ws.dictionary().terms().collect(),
            };
            for term in terms {
                let count = ws.dictionary().lookup(term).map_or(0, <[_]>::len);
                writeln!(out, "{}\t{} definition(s)", term, count)?;
            }
        }
        TermCommand::Show { term } => {
            let Some(definitions) = ws.dictionary().lookup(&term) else {
                bail!("No definitions for '{}'", term_key(&term));
            };
            for definition in definitions {
                writeln!(
                    out,
                    "{}\t{}\t(Source: {})",
                    definition.id,
                    payload_label(&definition.payload),
                    definition.source
                )?;
            }
        }
        TermCommand::Add { term, text, note } => {
            select_source(ws, note)?;
            let definition = ws.add_definition(&term, DefinitionPayload::text(text))?;
            writeln!(out, "Added definition {} to '{}'", definition.id, term_key(term.trim()))?;
        }
        TermCommand::AddImage { term, image_id, note } => {
            let url = ws
                .image(image_id)
                .map(|i| i.url.clone())
                .ok_or(DomainError::ImageNotFound(image_id))?;
            select_source(ws, note)?;
            let definition = ws.add_definition(&term, DefinitionPayload::image(url))?;
            writeln!(out, "Added definition {} to '{}'", definition.id, term_key(term.trim()))?;
        }
        TermCommand::Delete { term, definition_id } => {
            ws.delete_definition(&term, definition_id)?;
            writeln!(out, "Deleted definition {} from '{}'", definition_id, term_key(&term))?;
        }
    }
    Ok(())
}

fn select_source<S: RemoteStore>(ws: &mut Workspace<S>, note: Option<i64>) -> Result<()> {
    match note {
        Some(id) => ws.select_note(id)?,
        None => ws.clear_note_selection(),
    }
    Ok(())
}

fn payload_label(payload: &DefinitionPayload) -> String {
    match payload {
        DefinitionPayload::Text(text) => text.clone(),
        DefinitionPayload::Image(image) => format!("[image {}]", data_url_mime(&image.url)),
    }
}

fn data_url_mime(url: &str) -> &str {
    url.strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("unknown")
}

fn handle_image<S: RemoteStore>(ws: &mut Workspace<S>, action: ImageCommand, out: &mut dyn Write) -> Result<()> {
    match action {
        ImageCommand::List => list_gallery(ws, &GalleryView::browse(), out)?,
        ImageCommand::Add { path } => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .context("Image path has no file name")?;
            let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            let image = ws.upload_image(&ImageSource { file_name, bytes })?;
            writeln!(out, "Added image {}", image.id)?;
        }
        ImageCommand::Delete { image_id } => {
            if !ws.delete_image(image_id) {
                return Err(DomainError::ImageNotFound(image_id).into());
            }
            writeln!(out, "Deleted image {}", image_id)?;
        }
    }
    Ok(())
}

const ANNOTATE_HELP: &str = "\
commands:
  select <text>     mark text as the current selection
  clear             clear the selection
  hover <term>      preview definitions of a term
  click <term>      pin the definitions popup
  out | close       hover out / close the popup
  text | image      start a text or image definition
  confirm           use the selection as the term
  explain <text>    finish a text definition
  choose <image-id> finish an image definition
  cancel            abort the current definition
  highlight <text>  toggle a highlight on the first occurrence
  show              print the annotated note
  quit";

/// Line-driven annotation session on one note
pub fn annotate<S: RemoteStore>(
    ws: &mut Workspace<S>,
    note_id: i64,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    ws.select_note(note_id)?;
    let mut session = AnnotationSession::new();
    let gallery = GalleryView::select();
    writeln!(out, "Annotating note {} (type 'help' for commands)", note_id)?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let (command, argument) = match line.trim().split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (line.trim(), ""),
        };
        if matches!(command, "quit" | "exit") {
            break;
        }

        if let Err(e) = annotate_step(ws, note_id, &mut session, &gallery, command, argument, out) {
            writeln!(out, "error: {:#}", e)?;
        }
    }
    Ok(())
}

fn annotate_step<S: RemoteStore>(
    ws: &mut Workspace<S>,
    note_id: i64,
    session: &mut AnnotationSession,
    gallery: &GalleryView,
    command: &str,
    argument: &str,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        "" => {}
        "help" => writeln!(out, "{}", ANNOTATE_HELP)?,
        "select" => session.set_selection(argument),
        "clear" => session.clear_selection(),
        "hover" => {
            if let Some(popup) = session.hover(argument, ws.dictionary()) {
                print_popup(popup, out)?;
            }
        }
        "click" => print_popup(session.click(argument, ws.dictionary()), out)?,
        "out" => session.hover_out(),
        "close" => session.close_popup(),
        "text" => {
            session.begin_text_definition()?;
            writeln!(out, "Select the term, then 'confirm'")?;
        }
        "image" => {
            session.begin_image_definition()?;
            list_gallery(ws, gallery, out)?;
        }
        "confirm" => {
            let term = session.confirm_selection()?;
            writeln!(out, "Explanation for '{}'? (explain <text>)", term)?;
        }
        "explain" => match session.submit_explanation(argument)? {
            Some(effect) => apply(ws, effect, out)?,
            None => writeln!(out, "Cancelled")?,
        },
        "choose" => choose_image(ws, session, gallery, argument, out)?,
        "cancel" => {
            session.cancel();
            writeln!(out, "Cancelled")?;
        }
        "highlight" => highlight(ws, note_id, argument, out)?,
        "show" => show_annotated(ws, note_id, out)?,
        other => writeln!(out, "Unknown command '{}'", other)?,
    }
    Ok(())
}

fn print_popup(popup: &Popup, out: &mut dyn Write) -> Result<()> {
    match &popup.content {
        PopupContent::Empty => {
            writeln!(out, "{}: no definitions ('text' or 'image' to add one)", popup.term)?;
        }
        PopupContent::Definitions(definitions) => {
            writeln!(out, "{}:", popup.term)?;
            for definition in definitions {
                writeln!(out, "  - {} (Source: {})", payload_label(&definition.payload), definition.source)?;
            }
        }
    }
    Ok(())
}

fn list_gallery<S: RemoteStore>(ws: &Workspace<S>, gallery: &GalleryView, out: &mut dyn Write) -> Result<()> {
    match gallery.mode() {
        GalleryMode::Browse => {
            for image in ws.images() {
                let uploaded = DateTime::from_timestamp_millis(image.timestamp)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                writeln!(out, "{}\t{}\t{}", image.id, data_url_mime(&image.url), uploaded)?;
            }
        }
        GalleryMode::Select => {
            writeln!(out, "Choose an image (choose <image-id>):")?;
            for image in ws.images() {
                writeln!(out, "  {}\t{}", image.id, data_url_mime(&image.url))?;
            }
        }
    }
    if gallery.can_delete() && !ws.images().is_empty() {
        writeln!(out, "Remove one with 'image delete <image-id>'")?;
    }
    Ok(())
}

fn choose_image<S: RemoteStore>(
    ws: &mut Workspace<S>,
    session: &mut AnnotationSession,
    gallery: &GalleryView,
    argument: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let image_id: i64 = argument
        .parse()
        .with_context(|| format!("Not an image id: '{}'", argument))?;
    let image = ws.image(image_id).ok_or(DomainError::ImageNotFound(image_id))?;

    match gallery.click(image) {
        GalleryAction::Select(image) => {
            let effect = session.choose_image(&image)?;
            apply(ws, effect, out)
        }
        GalleryAction::Expand(url) => writeln!(out, "{}", url).map_err(Into::into),
    }
}

fn apply<S: RemoteStore>(ws: &mut Workspace<S>, effect: AnnotationEffect, out: &mut dyn Write) -> Result<()> {
    let definition = ws.apply_annotation(effect)?;
    writeln!(out, "Added definition {} (Source: {})", definition.id, definition.source)?;
    Ok(())
}

fn highlight<S: RemoteStore>(ws: &mut Workspace<S>, note_id: i64, text: &str, out: &mut dyn Write) -> Result<()> {
    let content = ws
        .note(note_id)
        .map(|n| n.content.clone())
        .ok_or(DomainError::NoteNotFound(note_id))?;
    let range = TextRange::find(&content, text)
        .ok_or_else(|| DomainError::InvalidSelection(format!("'{}' not found in note", text)))?;

    let updated = toggle_highlight(&content, range)?;
    ws.update_note_content(note_id, &updated);
    writeln!(out, "Toggled highlight on '{}'", text)?;
    Ok(())
}

fn show_annotated<S: RemoteStore>(ws: &Workspace<S>, note_id: i64, out: &mut dyn Write) -> Result<()> {
    let note = ws.note(note_id).ok_or(DomainError::NoteNotFound(note_id))?;
    writeln!(out, "{}", annotate_terms(&note.content, ws.dictionary()))?;
    Ok(())
}
