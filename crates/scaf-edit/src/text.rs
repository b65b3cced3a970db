//! Plain-text editor
//!
//! Applies replacement value objects to an arbitrary text file. Dirty
//! tracking compares against the originally loaded content, so a replacement
//! that matches nothing never marks the file changed.

use std::path::{Path, PathBuf};

use crate::editor::Editor;
use crate::error::Result;
use crate::replace::{LiteralReplacement, RegexReplacement};

/// Editor applying find/replace operations to one text file.
#[derive(Debug)]
pub struct TextEditor {
    path: PathBuf,
    original: String,
    current: String,
}

impl TextEditor {
    /// Load the file at `path`. A missing or unreadable file is a hard error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = scaf_fs::read_text(path)?;
        Ok(Self::from_content(path, content))
    }

    /// Build an editor over already-loaded content.
    pub fn from_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            original: content.clone(),
            current: content,
        }
    }

    /// Current buffer content.
    pub fn content(&self) -> &str {
        &self.current
    }

    /// Whether the buffer contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.current.contains(needle)
    }

    /// Apply a literal replacement.
    pub fn replace(&mut self, replacement: &LiteralReplacement) -> &mut Self {
        self.current = replacement.apply(&self.current);
        self
    }

    /// Apply a regex replacement.
    pub fn replace_regex(&mut self, replacement: &RegexReplacement) -> &mut Self {
        self.current = replacement.apply(&self.current);
        self
    }
}

impl Editor for TextEditor {
    type Error = crate::Error;

    fn is_changed(&self) -> bool {
        self.current != self.original
    }

    fn save(&mut self) -> Result<bool> {
        if !self.is_changed() {
            return Ok(false);
        }
        scaf_fs::write_text(&self.path, &self.current)?;
        tracing::debug!(path = %self.path.display(), "text file written");
        self.original = self.current.clone();
        Ok(true)
    }
}
