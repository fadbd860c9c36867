//! Document session manager: the ordered tabs of one window and their save lifecycle.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::app::dialogs::{Confirmation, Dialogs, FileDialogRequest, NoticeLevel};
use crate::app::naming::UntitledNamer;
use crate::domain::errors::{Cancelled, DocumentError};
use crate::domain::format::{TextColor, TextFont, TextFormat};
use crate::domain::model::{Document, DocumentId};
use crate::infra::config::Config;
use crate::infra::fs::{self, FileFilter};

pub const SAVE_CHANGES_PROMPT: &str = "Do you want to save changes to your text?";

/// Result of an operation that may be dismissed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Content was written to the path.
    Saved(PathBuf),
    /// The path was loaded into the active document.
    Opened(PathBuf),
    /// Nothing needed doing.
    Unchanged,
    /// A dialog was dismissed; no side effects happened.
    Cancelled,
}

/// How file dialogs are presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogSettings {
    /// Falls back to the current working directory when unset.
    pub initial_directory: Option<PathBuf>,
    pub default_filter: FileFilter,
    pub show_hidden: bool,
}

impl DialogSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_directory: config.dialogs.initial_directory.clone(),
            default_filter: config.dialogs.default_filter,
            show_hidden: config.dialogs.show_hidden,
        }
    }

    fn request(&self, title: &str, suggested_name: Option<String>) -> FileDialogRequest {
        let initial_directory = self
            .initial_directory
            .clone()
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        FileDialogRequest {
            title: title.to_string(),
            initial_directory,
            filter: self.default_filter,
            show_hidden: self.show_hidden,
            suggested_name,
        }
    }
}

/// Ordered set of documents open in one window. At most one document is active; the session
/// is only empty before its first document is created.
#[derive(Debug, Clone, Default)]
pub struct Session {
    documents: Vec<Document>,
    active: usize,
    format: TextFormat,
    dialog_settings: DialogSettings,
}

impl Session {
    /// Create an empty session. Callers normally follow up with [`Session::new_document`].
    pub fn new(dialog_settings: DialogSettings, format: TextFormat) -> Self {
        Self {
            documents: Vec::new(),
            active: 0,
            format,
            dialog_settings,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Document> {
        self.documents.get(self.active)
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active().map(Document::id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id() == id)
    }

    pub fn format(&self) -> TextFormat {
        self.format
    }

    /// Whether any document carries unsaved edits.
    pub fn has_unsaved_changes(&self) -> bool {
        self.documents.iter().any(Document::is_dirty)
    }

    /// Append an empty, clean, untitled document and make it active.
    pub fn new_document(&mut self, namer: &mut UntitledNamer) -> &Document {
        let document = Document::untitled(namer.next_id(), namer.next_name());
        debug!(id = %document.id(), name = %document.display_name(), "new document");
        self.documents.push(document);
        self.active = self.documents.len() - 1;
        &self.documents[self.active]
    }

    /// Load `path` into the active document, replacing its content and path. State is left
    /// untouched when the file cannot be read.
    pub fn open_document(
        &mut self,
        path: &Path,
        namer: &mut UntitledNamer,
    ) -> Result<&Document, DocumentError> {
        let content = fs::read_text(path)?;
        if self.documents.is_empty() {
            self.new_document(namer);
        }
        Ok(self.load_into_active(path, content))
    }

    /// Load `path` into a new tab. No tab is created when the file cannot be read.
    pub fn open_in_new_document(
        &mut self,
        path: &Path,
        namer: &mut UntitledNamer,
    ) -> Result<&Document, DocumentError> {
        let content = fs::read_text(path)?;
        let document = Document::from_file(namer.next_id(), path.to_path_buf(), content);
        info!(id = %document.id(), path = %path.display(), "opened document in new tab");
        self.documents.push(document);
        self.active = self.documents.len() - 1;
        Ok(&self.documents[self.active])
    }

    /// Menu-driven open: offer to save pending edits, then ask for a file to load into the
    /// active document.
    pub fn open_with_dialog(
        &mut self,
        namer: &mut UntitledNamer,
        dialogs: &mut dyn Dialogs,
    ) -> Result<Outcome, DocumentError> {
        if self.close_session_check(dialogs).is_err() {
            return Ok(Outcome::Cancelled);
        }
        let request = self.dialog_settings.request("Open", None);
        let Some(path) = dialogs.pick_open_path(&request) else {
            return Ok(Outcome::Cancelled);
        };
        self.open_document(&path, namer)?;
        Ok(Outcome::Opened(path))
    }

    /// Replace a document's content. Always marks it dirty.
    pub fn edit(&mut self, id: DocumentId, content: impl Into<String>) -> Result<(), DocumentError> {
        let document = self.document_mut(id)?;
        let was_dirty = document.is_dirty();
        document.edit(content);
        if !was_dirty {
            debug!(id = %id, "document became dirty");
        }
        Ok(())
    }

    /// Write a dirty document to its path, or ask for one when it has never been saved.
    pub fn save(
        &mut self,
        id: DocumentId,
        dialogs: &mut dyn Dialogs,
    ) -> Result<Outcome, DocumentError> {
        let document = self.document_mut(id)?;
        if !document.is_dirty() {
            return Ok(Outcome::Unchanged);
        }
        let path = document.file_path().map(Path::to_path_buf);
        match path {
            Some(path) => self.write_document(id, path),
            None => self.save_as(id, dialogs),
        }
    }

    /// Ask for a destination and write the document there.
    pub fn save_as(
        &mut self,
        id: DocumentId,
        dialogs: &mut dyn Dialogs,
    ) -> Result<Outcome, DocumentError> {
        let suggested = self.document_mut(id)?.display_name();
        let request = self.dialog_settings.request("Save As", Some(suggested));
        match dialogs.pick_save_path(&request) {
            Some(path) => self.write_document(id, path),
            None => {
                debug!(id = %id, "save as cancelled");
                Ok(Outcome::Cancelled)
            }
        }
    }

    /// Save every document in session order. Every document is attempted; the first failure is
    /// returned afterwards.
    pub fn save_all(&mut self, dialogs: &mut dyn Dialogs) -> Result<(), DocumentError> {
        let ids: Vec<DocumentId> = self.documents.iter().map(Document::id).collect();
        let mut first_error = None;
        for id in ids {
            if let Err(err) = self.save(id, dialogs)
                && first_error.is_none()
            {
                first_error = Some(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Unsaved-changes sweep run before the window closes or a file replaces the active tab.
    ///
    /// Each dirty, non-empty document triggers a prompt; `Yes` saves everything, `No` moves on,
    /// `Cancel` aborts the sweep. Dirty documents with empty content are skipped silently.
    pub fn close_session_check(&mut self, dialogs: &mut dyn Dialogs) -> Result<(), Cancelled> {
        for index in 0..self.documents.len() {
            let document = &self.documents[index];
            if !document.is_dirty() || document.content().is_empty() {
                continue;
            }
            let title = document.display_name();
            match dialogs.confirm(&title, SAVE_CHANGES_PROMPT, true) {
                Confirmation::Yes => {
                    if let Err(err) = self.save_all(dialogs) {
                        warn!(error = %err, "saving during close check failed");
                        dialogs.notify(NoticeLevel::Error, &err.to_string());
                    }
                }
                Confirmation::No => {
                    debug!(document = %title, "discarding unsaved changes");
                }
                Confirmation::Cancel => return Err(Cancelled),
            }
        }
        Ok(())
    }

    /// Close a single tab, offering to save it first. Closing the last tab leaves a fresh
    /// untitled document behind. A failed or dismissed save keeps the tab open.
    pub fn close_document(
        &mut self,
        id: DocumentId,
        namer: &mut UntitledNamer,
        dialogs: &mut dyn Dialogs,
    ) -> Result<(), Cancelled> {
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };
        let document = &self.documents[index];
        if document.is_dirty() && !document.content().is_empty() {
            let title = document.display_name();
            match dialogs.confirm(&title, SAVE_CHANGES_PROMPT, true) {
                Confirmation::Yes => match self.save(id, dialogs) {
                    Ok(Outcome::Cancelled) => return Err(Cancelled),
                    Ok(_) => {}
                    Err(err) => {
                        warn!(error = %err, "save before close failed");
                        dialogs.notify(NoticeLevel::Error, &err.to_string());
                        return Err(Cancelled);
                    }
                },
                Confirmation::No => {}
                Confirmation::Cancel => return Err(Cancelled),
            }
        }

        let removed = self.documents.remove(index);
        debug!(id = %removed.id(), "closed document");
        if self.active > index || self.active >= self.documents.len() {
            self.active = self.active.saturating_sub(1);
        }
        if self.documents.is_empty() {
            self.new_document(namer);
        }
        Ok(())
    }

    /// Make the document at `index` active. Returns `false` when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.documents.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        if !self.documents.is_empty() {
            self.active = (self.active + 1) % self.documents.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.documents.is_empty() {
            self.active = (self.active + self.documents.len() - 1) % self.documents.len();
        }
    }

    /// Apply a font and color to every document of the session.
    pub fn apply_format(&mut self, format: TextFormat) {
        debug!(font = %format.font, color = %format.color, "format applied");
        self.format = format;
    }

    pub fn choose_font(&mut self, dialogs: &mut dyn Dialogs) -> Result<TextFont, Cancelled> {
        let font = dialogs.pick_font(self.format.font).ok_or(Cancelled)?;
        self.apply_format(TextFormat { font, ..self.format });
        Ok(font)
    }

    pub fn choose_color(&mut self, dialogs: &mut dyn Dialogs) -> Result<TextColor, Cancelled> {
        let color = dialogs.pick_color(self.format.color).ok_or(Cancelled)?;
        self.apply_format(TextFormat { color, ..self.format });
        Ok(color)
    }

    pub fn index_of(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id() == id)
    }

    fn document_mut(&mut self, id: DocumentId) -> Result<&mut Document, DocumentError> {
        self.documents
            .iter_mut()
            .find(|doc| doc.id() == id)
            .ok_or(DocumentError::UnknownDocument(id))
    }

    fn load_into_active(&mut self, path: &Path, content: String) -> &Document {
        let document = &mut self.documents[self.active];
        document.load(path.to_path_buf(), content);
        info!(id = %document.id(), path = %path.display(), "opened document");
        document
    }

    fn write_document(&mut self, id: DocumentId, path: PathBuf) -> Result<Outcome, DocumentError> {
        let document = self.document_mut(id)?;
        if let Err(err) = fs::write_text(&path, document.content()) {
            warn!(id = %id, path = %path.display(), error = %err, "save failed");
            return Err(err);
        }
        document.mark_saved(path.clone());
        info!(id = %id, path = %path.display(), "saved document");
        Ok(Outcome::Saved(path))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    #[derive(Default)]
    struct Scripted {
        save_paths: VecDeque<Option<PathBuf>>,
        answers: VecDeque<Confirmation>,
        prompts: Vec<String>,
        save_requests: Vec<FileDialogRequest>,
        notices: Vec<String>,
    }

    impl Dialogs for Scripted {
        fn pick_open_path(&mut self, _request: &FileDialogRequest) -> Option<PathBuf> {
            None
        }

        fn pick_save_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
            self.save_requests.push(request.clone());
            self.save_paths.pop_front().flatten()
        }

        fn confirm(&mut self, title: &str, _message: &str, _allow_cancel: bool) -> Confirmation {
            self.prompts.push(title.to_string());
            self.answers.pop_front().unwrap_or(Confirmation::No)
        }

        fn pick_font(&mut self, _current: TextFont) -> Option<TextFont> {
            Some(TextFont {
                bold: true,
                ..TextFont::default()
            })
        }

        fn pick_color(&mut self, _current: TextColor) -> Option<TextColor> {
            None
        }

        fn notify(&mut self, _level: NoticeLevel, message: &str) {
            self.notices.push(message.to_string());
        }
    }

    fn session_with(docs: usize, namer: &mut UntitledNamer) -> Session {
        let mut session = Session::new(DialogSettings::default(), TextFormat::default());
        for _ in 0..docs {
            session.new_document(namer);
        }
        session
    }

    #[test]
    fn new_document_is_clean_and_active() {
        let mut namer = UntitledNamer::new();
        let mut session = session_with(1, &mut namer);
        let id = session.new_document(&mut namer).id();
        assert_eq!(session.len(), 2);
        assert_eq!(session.active_id(), Some(id));
        let active = session.active().unwrap();
        assert!(!active.is_dirty());
        assert_eq!(active.display_name(), "Untitled2");
    }

    #[test]
    fn save_without_path_delegates_to_save_as() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("draft.txt");
        let mut namer = UntitledNamer::new();
        let mut session = session_with(1, &mut namer);
        let id = session.active_id().unwrap();
        session.edit(id, "draft").unwrap();

        let mut dialogs = Scripted::default();
        dialogs.save_paths.push_back(Some(target.clone()));
        let outcome = session.save(id, &mut dialogs).unwrap();

        assert_eq!(outcome, Outcome::Saved(target.clone()));
        assert_eq!(dialogs.save_requests.len(), 1);
        assert_eq!(
            dialogs.save_requests[0].suggested_name.as_deref(),
            Some("Untitled1")
        );
        assert_eq!(session.document(id).unwrap().file_path(), Some(target.as_path()));
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn save_all_keeps_going_after_failure() {
        let temp = tempfile::tempdir().unwrap();
        let mut namer = UntitledNamer::new();
        let mut session = session_with(2, &mut namer);
        let first = session.documents()[0].id();
        let second = session.documents()[1].id();
        session.edit(first, "one").unwrap();
        session.edit(second, "two").unwrap();

        let mut dialogs = Scripted::default();
        dialogs
            .save_paths
            .push_back(Some(temp.path().join("missing-dir").join("one.txt")));
        dialogs.save_paths.push_back(Some(temp.path().join("two.txt")));

        let result = session.save_all(&mut dialogs);
        assert!(matches!(result, Err(DocumentError::NotFound { .. })));
        assert!(session.document(first).unwrap().is_dirty());
        assert!(!session.document(second).unwrap().is_dirty());
    }

    #[test]
    fn close_check_yes_saves_everything_once() {
        let temp = tempfile::tempdir().unwrap();
        let mut namer = UntitledNamer::new();
        let mut session = session_with(2, &mut namer);
        let first = session.documents()[0].id();
        let second = session.documents()[1].id();
        session.edit(first, "one").unwrap();
        session.edit(second, "two").unwrap();

        let mut dialogs = Scripted::default();
        dialogs.answers.push_back(Confirmation::Yes);
        dialogs.save_paths.push_back(Some(temp.path().join("one.txt")));
        dialogs.save_paths.push_back(Some(temp.path().join("two.txt")));

        session.close_session_check(&mut dialogs).unwrap();
        assert_eq!(dialogs.prompts, vec!["Untitled1"]);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn close_check_cancel_aborts() {
        let mut namer = UntitledNamer::new();
        let mut session = session_with(1, &mut namer);
        let id = session.active_id().unwrap();
        session.edit(id, "keep me").unwrap();

        let mut dialogs = Scripted::default();
        dialogs.answers.push_back(Confirmation::Cancel);
        assert_eq!(session.close_session_check(&mut dialogs), Err(Cancelled));
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn close_check_reports_failed_saves() {
        let temp = tempfile::tempdir().unwrap();
        let mut namer = UntitledNamer::new();
        let mut session = session_with(1, &mut namer);
        let id = session.active_id().unwrap();
        session.edit(id, "text").unwrap();

        let mut dialogs = Scripted::default();
        dialogs.answers.push_back(Confirmation::Yes);
        dialogs
            .save_paths
            .push_back(Some(temp.path().join("nope").join("a.txt")));

        assert!(session.close_session_check(&mut dialogs).is_ok());
        assert_eq!(dialogs.notices.len(), 1);
    }

    #[test]
    fn closing_last_document_leaves_fresh_untitled() {
        let mut namer = UntitledNamer::new();
        let mut session = session_with(1, &mut namer);
        let id = session.active_id().unwrap();
        session.edit(id, "").unwrap();

        let mut dialogs = Scripted::default();
        session.close_document(id, &mut namer, &mut dialogs).unwrap();
        assert!(dialogs.prompts.is_empty());
        assert_eq!(session.len(), 1);
        assert_eq!(session.active().unwrap().display_name(), "Untitled2");
    }

    #[test]
    fn close_document_with_dismissed_save_keeps_tab() {
        let mut namer = UntitledNamer::new();
        let mut session = session_with(2, &mut namer);
        let id = session.documents()[0].id();
        session.edit(id, "unsaved").unwrap();

        let mut dialogs = Scripted::default();
        dialogs.answers.push_back(Confirmation::Yes);
        dialogs.save_paths.push_back(None);

        assert_eq!(session.close_document(id, &mut namer, &mut dialogs), Err(Cancelled));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn closing_tab_before_active_keeps_selection() {
        let mut namer = UntitledNamer::new();
        let mut session = session_with(3, &mut namer);
        let first = session.documents()[0].id();
        let last = session.documents()[2].id();
        assert_eq!(session.active_id(), Some(last));

        session
            .close_document(first, &mut namer, &mut Scripted::default())
            .unwrap();
        assert_eq!(session.active_id(), Some(last));
    }

    #[test]
    fn selection_wraps_around() {
        let mut namer = UntitledNamer::new();
        let mut session = session_with(3, &mut namer);
        session.select_next();
        assert_eq!(session.active_index(), 0);
        session.select_previous();
        assert_eq!(session.active_index(), 2);
        assert!(!session.select(3));
        assert!(session.select(1));
    }

    #[test]
    fn format_choices_apply_to_session() {
        let mut namer = UntitledNamer::new();
        let mut session = session_with(2, &mut namer);
        let mut dialogs = Scripted::default();

        let font = session.choose_font(&mut dialogs).unwrap();
        assert!(font.bold);
        assert_eq!(session.format().font, font);

        assert_eq!(session.choose_color(&mut dialogs), Err(Cancelled));
        assert_eq!(session.format().color, TextColor::Default);
    }
}
