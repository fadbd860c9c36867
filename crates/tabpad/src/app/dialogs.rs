//! Modal dialogs the session manager delegates to the host UI.

use std::path::PathBuf;

use crate::domain::format::{TextColor, TextFont};
use crate::infra::fs::FileFilter;

/// Answer to a yes/no(/cancel) prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Cancel,
}

/// Severity of a non-modal notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Parameters for an open or save file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDialogRequest {
    pub title: String,
    pub initial_directory: PathBuf,
    pub filter: FileFilter,
    pub show_hidden: bool,
    /// Pre-filled file name for save dialogs.
    pub suggested_name: Option<String>,
}

/// Dialog collaborator. Every method blocks until the user answers; `None` means the dialog
/// was dismissed.
pub trait Dialogs {
    fn pick_open_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf>;

    fn pick_save_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf>;

    fn confirm(&mut self, title: &str, message: &str, allow_cancel: bool) -> Confirmation;

    fn pick_font(&mut self, current: TextFont) -> Option<TextFont>;

    fn pick_color(&mut self, current: TextColor) -> Option<TextColor>;

    /// Show a non-modal notification. Hosts without a status area may ignore it.
    fn notify(&mut self, _level: NoticeLevel, _message: &str) {}
}
