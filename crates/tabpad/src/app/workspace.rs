//! Window management: every open window owns one [`Session`].

use std::path::Path;

use tracing::{debug, info};

use crate::app::dialogs::{Confirmation, Dialogs};
use crate::app::naming::UntitledNamer;
use crate::app::session::{DialogSettings, Session};
use crate::domain::errors::{Cancelled, DocumentError};
use crate::domain::format::TextFormat;
use crate::infra::config::Config;

pub const APP_TITLE: &str = "tabpad";
pub const EXIT_PROMPT: &str = "Do you really want to go out?";

/// All windows of the process plus the naming service they share.
#[derive(Debug)]
pub struct Workspace {
    windows: Vec<Session>,
    active: usize,
    namer: UntitledNamer,
    dialog_settings: DialogSettings,
    format: TextFormat,
}

impl Workspace {
    /// Start with a single window holding one untitled document.
    pub fn new(config: &Config) -> Self {
        let mut workspace = Self {
            windows: Vec::new(),
            active: 0,
            namer: UntitledNamer::new(),
            dialog_settings: DialogSettings::from_config(config),
            format: config.format.to_text_format(),
        };
        workspace.new_window();
        workspace
    }

    pub fn windows(&self) -> &[Session] {
        &self.windows
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Whether every window has been closed and the application should stop.
    pub fn is_finished(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.windows.get(self.active)
    }

    /// Active session together with the naming service, for operations that create documents.
    pub fn active_parts(&mut self) -> Option<(&mut Session, &mut UntitledNamer)> {
        let session = self.windows.get_mut(self.active)?;
        Some((session, &mut self.namer))
    }

    pub fn active_session_mut(&mut self) -> Option<&mut Session> {
        self.windows.get_mut(self.active)
    }

    /// Open another window with a fresh untitled document and focus it.
    pub fn new_window(&mut self) -> &Session {
        let mut session = Session::new(self.dialog_settings.clone(), self.format);
        session.new_document(&mut self.namer);
        self.windows.push(session);
        self.active = self.windows.len() - 1;
        debug!(windows = self.windows.len(), "opened window");
        &self.windows[self.active]
    }

    /// Open `path` in its own tab of the active window. The initial untitled tab is reused while
    /// it is still pristine.
    pub fn open_path(&mut self, path: &Path) -> Result<(), DocumentError> {
        let Some((session, namer)) = self.active_parts() else {
            return Ok(());
        };
        let reuse = session.len() == 1
            && session
                .active()
                .is_some_and(|doc| doc.file_path().is_none() && !doc.is_dirty());
        if reuse {
            session.open_document(path, namer)?;
        } else {
            session.open_in_new_document(path, namer)?;
        }
        Ok(())
    }

    pub fn focus_next_window(&mut self) {
        if !self.windows.is_empty() {
            self.active = (self.active + 1) % self.windows.len();
        }
    }

    /// Run the unsaved-changes sweep for window `index` and drop it when the user does not
    /// cancel.
    pub fn close_window(&mut self, index: usize, dialogs: &mut dyn Dialogs) -> Result<(), Cancelled> {
        let Some(session) = self.windows.get_mut(index) else {
            return Ok(());
        };
        session.close_session_check(dialogs)?;
        self.windows.remove(index);
        if self.active > index || self.active >= self.windows.len() {
            self.active = self.active.saturating_sub(1);
        }
        info!(remaining = self.windows.len(), "closed window");
        Ok(())
    }

    /// Exit command: confirm, then close the active window.
    pub fn exit(&mut self, dialogs: &mut dyn Dialogs) -> Result<(), Cancelled> {
        match dialogs.confirm(APP_TITLE, EXIT_PROMPT, false) {
            Confirmation::Yes => self.close_window(self.active, dialogs),
            Confirmation::No | Confirmation::Cancel => Err(Cancelled),
        }
    }

    /// Close every window in order, stopping at the first cancelled sweep.
    pub fn quit_all(&mut self, dialogs: &mut dyn Dialogs) -> Result<(), Cancelled> {
        while !self.windows.is_empty() {
            self.close_window(0, dialogs)?;
        }
        Ok(())
    }
}
