// src/infrastructure/renderer.rs
use crate::constants::BROWSER_LAUNCH_DELAY_MS;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};
use tracing::instrument;

/// Writes rendered pages to a private temp directory and opens them in the
/// default browser.
#[derive(Debug, Default)]
pub struct BrowserRenderer {
    // Keep the last temp dir alive so the browser can still read the page
    temp_dir: Option<TempDir>,
}

impl BrowserRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `content` as `<name>.html` in a fresh temp directory
    pub fn create_temp_file(&mut self, name: &str, content: &str) -> Result<PathBuf> {
        let temp_dir = Builder::new()
            .prefix("termnote-")
            .rand_bytes(5)
            .tempdir()
            .context("Failed to create temporary directory")?;

        let file_path = temp_dir.path().join(format!("{}.html", sanitize(name)));

        File::create(&file_path)
            .with_context(|| format!("Failed to create temp file at {}", file_path.display()))?
            .write_all(content.as_bytes())
            .context("Failed to write content to temporary file")?;

        self.temp_dir = Some(temp_dir);
        Ok(file_path)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn open_in_browser(&self, path: &Path) -> Result<()> {
        let path_str = path.to_str().context("Failed to convert path to string")?;

        #[cfg(target_os = "macos")]
        {
            std::process::Command::new("open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(target_os = "windows")]
        {
            std::process::Command::new("cmd")
                .args(["/C", "start", path_str])
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            std::process::Command::new("xdg-open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }

        std::thread::sleep(std::time::Duration::from_millis(BROWSER_LAUNCH_DELAY_MS));
        Ok(())
    }
}

/// File-name-safe version of a note title
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "note".to_string()
    } else {
        cleaned
    }
}
