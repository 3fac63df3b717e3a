mod helpers;

use anyhow::Result;
use helpers::{memory_workspace, test_notes};
use std::io::{Cursor, Write};
use termnote::application::ImportSource;
use termnote::cli::args::Command;
use termnote::cli::handlers;
use termnote::domain::DomainError;
use termnote::infrastructure::converter_for;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn docx_bytes() -> Result<Vec<u8>> {
    let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Cell biology</w:t></w:r></w:p>
    <w:p><w:r><w:rPr><w:b/></w:rPr><w:t>ATP</w:t></w:r><w:r><w:t xml:space="preserve"> stores energy.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("word/document.xml", SimpleFileOptions::default())?;
    writer.write_all(xml.as_bytes())?;
    Ok(writer.finish()?.into_inner())
}

#[test]
fn given_docx_when_importing_then_note_created_in_active_folder() -> Result<()> {
    // Arrange
    let (_store, mut workspace) = memory_workspace()?;
    let source = ImportSource {
        file_name: "Cells.docx".to_string(),
        bytes: docx_bytes()?,
    };
    let converter = converter_for(&source.file_name)?;

    // Act
    let note = workspace.import_document(&source, None, converter.as_ref())?;

    // Assert
    assert_eq!(note.title, "Cells");
    assert_eq!(note.folder_id, "study");
    assert_eq!(
        note.content,
        "<h1>Cell biology</h1><p><strong>ATP</strong> stores energy.</p>"
    );
    assert_eq!(note.preview, "Cell biology ATP stores energy....");
    assert_eq!(workspace.notes()[0].id, note.id);
    assert_eq!(workspace.active_note_id(), Some(note.id));
    Ok(())
}

#[test]
fn given_corrupt_docx_when_importing_then_fails_without_partial_note() -> Result<()> {
    // Arrange
    let (_store, mut workspace) = memory_workspace()?;
    let source = ImportSource {
        file_name: "broken.docx".to_string(),
        bytes: b"not a zip archive".to_vec(),
    };
    let converter = converter_for(&source.file_name)?;

    // Act
    let result = workspace.import_document(&source, None, converter.as_ref());

    // Assert
    assert!(matches!(result, Err(DomainError::ImportFailed(_))));
    assert_eq!(workspace.notes().len(), 3);
    Ok(())
}

#[test]
fn given_unsupported_extension_when_choosing_converter_then_rejected() {
    let result = converter_for("slides.pptx");

    assert!(matches!(result, Err(DomainError::UnsupportedFormat(_))));
}

#[test]
fn given_directory_when_importing_then_imports_supported_files_only() -> Result<()> {
    // Arrange
    let (_store, mut workspace) = memory_workspace()?;
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("a.md"), "# Mitosis\n\nCells **divide**.")?;
    std::fs::write(dir.path().join("b.txt"), "first line\nsecond line")?;
    std::fs::write(dir.path().join("c.pdf"), "ignored")?;
    std::fs::create_dir(dir.path().join("nested"))?;
    std::fs::write(dir.path().join("nested/d.html"), "<p>deep</p>")?;
    let mut out = Vec::new();

    // Act
    handlers::execute(
        &mut workspace,
        Command::Import {
            path: dir.path().to_path_buf(),
            folder: Some("notes".to_string()),
            recursive: false,
        },
        &mut out,
    )?;

    // Assert
    let output = String::from_utf8(out)?;
    assert!(output.ends_with("Imported 2 document(s), 0 failed\n"));
    let imported: Vec<&str> = workspace
        .notes_in_folder("notes")
        .filter(|n| n.id != test_notes::SHOPPING)
        .map(|n| n.title.as_str())
        .collect();
    assert_eq!(imported, vec!["b", "a"]);
    let text_note = workspace.notes().iter().find(|n| n.title == "b").unwrap();
    assert_eq!(text_note.content, "<p>first line<br>second line</p>");
    Ok(())
}

#[test]
fn given_recursive_flag_when_importing_directory_then_descends() -> Result<()> {
    // Arrange
    let (_store, mut workspace) = memory_workspace()?;
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("nested"))?;
    std::fs::write(dir.path().join("nested/deep.html"), "<p>deep</p>")?;
    let mut out = Vec::new();

    // Act
    handlers::execute(
        &mut workspace,
        Command::Import {
            path: dir.path().to_path_buf(),
            folder: None,
            recursive: true,
        },
        &mut out,
    )?;

    // Assert
    let note = workspace.notes().iter().find(|n| n.title == "deep").unwrap();
    assert_eq!(note.content, "<p>deep</p>");
    assert_eq!(note.folder_id, "study");
    Ok(())
}

#[test]
fn given_unknown_target_folder_when_importing_then_fails() -> Result<()> {
    // Arrange
    let (_store, mut workspace) = memory_workspace()?;
    let source = ImportSource {
        file_name: "x.html".to_string(),
        bytes: b"<p>x</p>".to_vec(),
    };
    let converter = converter_for(&source.file_name)?;

    // Act
    let result = workspace.import_document(&source, Some("ghost"), converter.as_ref());

    // Assert
    assert_eq!(result, Err(DomainError::FolderNotFound("ghost".to_string())));
    Ok(())
}
