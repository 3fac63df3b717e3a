use clap::Parser;
use std::path::PathBuf;
use termnote::cli::args::{Args, Command, FolderCommand, NoteCommand, TermCommand};

#[test]
fn given_no_subcommand_when_parsing_then_fails() {
    // Arrange
    let args = vec!["termnote", "1234567890"];

    // Act & Assert
    let result = Args::try_parse_from(args);
    assert!(result.is_err(), "Should fail without subcommand");
}

#[test]
fn given_note_show_command_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["termnote", "note", "show", "1234567890"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Note {
            action: NoteCommand::Show { note_id, json },
        } => {
            assert_eq!(note_id, 1234567890);
            assert!(!json);
        }
        _ => panic!("Expected note show command"),
    }
    assert_eq!(parsed.store, None);
    assert_eq!(parsed.config, None);
}

#[test]
fn given_global_store_after_subcommand_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["termnote", "folders", "--store", "/tmp/store.json"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert!(matches!(parsed.command, Command::Folders));
    assert_eq!(parsed.store, Some(PathBuf::from("/tmp/store.json")));
}

#[test]
fn given_folder_add_without_name_when_parsing_then_name_is_none() {
    // Arrange
    let args = vec!["termnote", "folder", "add"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Folder {
            action: FolderCommand::Add { name },
        } => assert_eq!(name, None),
        _ => panic!("Expected folder add command"),
    }
}

#[test]
fn given_notes_with_folder_filter_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["termnote", "notes", "-f", "study", "--json"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Notes { folder, json } => {
            assert_eq!(folder.as_deref(), Some("study"));
            assert!(json);
        }
        _ => panic!("Expected notes command"),
    }
}

#[test]
fn given_import_with_flags_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["termnote", "import", "docs", "--folder", "bio", "-r"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Import {
            path,
            folder,
            recursive,
        } => {
            assert_eq!(path, PathBuf::from("docs"));
            assert_eq!(folder.as_deref(), Some("bio"));
            assert!(recursive);
        }
        _ => panic!("Expected import command"),
    }
}

#[test]
fn given_term_add_with_note_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["termnote", "term", "add", "ATP", "energy currency", "-n", "42"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Term {
            action: TermCommand::Add { term, text, note },
        } => {
            assert_eq!(term, "ATP");
            assert_eq!(text, "energy currency");
            assert_eq!(note, Some(42));
        }
        _ => panic!("Expected term add command"),
    }
}

#[test]
fn given_term_add_image_when_parsing_then_uses_kebab_case() {
    // Arrange
    let args = vec!["termnote", "term", "add-image", "chloroplast", "7"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Term {
            action: TermCommand::AddImage { term, image_id, note },
        } => {
            assert_eq!(term, "chloroplast");
            assert_eq!(image_id, 7);
            assert_eq!(note, None);
        }
        _ => panic!("Expected term add-image command"),
    }
}

#[test]
fn given_invalid_note_id_when_parsing_then_fails() {
    // Arrange
    let args = vec!["termnote", "note", "delete", "not-a-number"];

    // Act & Assert
    let result = Args::try_parse_from(args);
    assert!(result.is_err(), "Should fail with invalid note ID");
}

#[test]
fn given_verbose_flags_when_parsing_then_counts() {
    // Arrange
    let args = vec!["termnote", "-vv", "folders"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(parsed.verbose, 2);
}

#[test]
fn given_annotate_command_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["termnote", "annotate", "1700000000001"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Annotate { note_id } => assert_eq!(note_id, 1700000000001),
        _ => panic!("Expected annotate command"),
    }
}
