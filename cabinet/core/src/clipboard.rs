//! Clipboard
//!
//! Best-effort copy target for the preset preview. Failures become an
//! informational banner and never affect the session.

use std::path::PathBuf;

use parking_lot::Mutex;

/// Somewhere the preview value can be copied to
pub trait Clipboard: Send + Sync {
    /// Write `text` to the clipboard
    ///
    /// # Errors
    ///
    /// Any failure; the store only reports that copying did not work.
    fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Clipboard backed by a file (the CLI's `--copy-to`)
#[derive(Clone, Debug)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    /// Copy into `path`, replacing its content
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Clipboard for FileClipboard {
    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, text)?;
        tracing::debug!(path = %self.path.display(), "Copied preview to file");
        Ok(())
    }
}

/// In-memory clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last copied text
    #[must_use]
    pub fn content(&self) -> Option<String> {
        self.content.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        *self.content.lock() = Some(text.to_string());
        Ok(())
    }
}
