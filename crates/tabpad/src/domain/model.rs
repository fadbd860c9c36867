//! Domain models for open documents.

use std::fmt;
use std::path::{Path, PathBuf};

/// Stable identifier for a document, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a document has unsaved edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirtyState {
    #[default]
    Clean,
    Dirty,
}

/// One open, editable text buffer, optionally backed by a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    content: String,
    file_path: Option<PathBuf>,
    state: DirtyState,
    placeholder: String,
}

impl Document {
    /// Create an empty, clean, untitled document.
    pub fn untitled(id: DocumentId, placeholder: impl Into<String>) -> Self {
        Self {
            id,
            content: String::new(),
            file_path: None,
            state: DirtyState::Clean,
            placeholder: placeholder.into(),
        }
    }

    /// Create a clean document holding `content` loaded from `path`.
    pub fn from_file(id: DocumentId, path: PathBuf, content: String) -> Self {
        Self {
            id,
            content,
            file_path: Some(path),
            state: DirtyState::Clean,
            placeholder: String::new(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn state(&self) -> DirtyState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == DirtyState::Dirty
    }

    /// File base name when backed by a file, otherwise the `UntitledN` placeholder.
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.placeholder.clone())
    }

    /// Label shown on the document's tab. Dirty documents carry a leading `*`.
    pub fn tab_title(&self) -> String {
        match self.state {
            DirtyState::Clean => self.display_name(),
            DirtyState::Dirty => format!("*{}", self.display_name()),
        }
    }

    /// Replace the content. Every edit marks the document dirty, even when the text is unchanged.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.state = DirtyState::Dirty;
    }

    /// Replace content and path with freshly loaded file data.
    pub(crate) fn load(&mut self, path: PathBuf, content: String) {
        self.content = content;
        self.file_path = Some(path);
        self.state = DirtyState::Clean;
    }

    /// Record a successful write to `path`.
    pub(crate) fn mark_saved(&mut self, path: PathBuf) {
        self.file_path = Some(path);
        self.state = DirtyState::Clean;
    }
}
