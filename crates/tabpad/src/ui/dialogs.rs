//! [`Dialogs`] backed by terminal overlays. Each dialog runs its own event loop until answered,
//! the way a desktop modal dialog blocks its caller.

use std::path::PathBuf;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};
use tracing::warn;

use crate::app::dialogs::{Confirmation, Dialogs, FileDialogRequest, NoticeLevel};
use crate::app::workspace::APP_TITLE;
use crate::domain::format::{TextColor, TextFont};
use crate::ui::components::modal::{
    ColorModal, ConfirmModal, FileMode, FileModal, FontModal, Modal, ModalStep,
};

/// Dialog host drawing onto the application's terminal.
pub struct TerminalDialogs<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    notices: Vec<(NoticeLevel, String)>,
}

impl<'a, B: Backend> TerminalDialogs<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>) -> Self {
        Self {
            terminal,
            notices: Vec::new(),
        }
    }

    /// Notifications raised while dialogs were open, oldest first.
    pub fn into_notices(self) -> Vec<(NoticeLevel, String)> {
        self.notices
    }

    fn run<M: Modal>(&mut self, mut modal: M) -> Option<M::Output> {
        loop {
            let drawn = self.terminal.draw(|frame| {
                let area = frame.size();
                let backdrop = Block::default()
                    .title(APP_TITLE)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray));
                frame.render_widget(backdrop, area);
                modal.render(frame, area);
            });
            if let Err(err) = drawn {
                warn!(error = %err, "failed to draw dialog");
                return None;
            }

            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let ModalStep::Close(result) = modal.handle_key(key) {
                        return result;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "failed to read terminal event");
                    return None;
                }
            }
        }
    }
}

impl<B: Backend> Dialogs for TerminalDialogs<'_, B> {
    fn pick_open_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
        self.run(FileModal::new(FileMode::Open, request))
    }

    fn pick_save_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
        self.run(FileModal::new(FileMode::Save, request))
    }

    fn confirm(&mut self, title: &str, message: &str, allow_cancel: bool) -> Confirmation {
        let fallback = if allow_cancel {
            Confirmation::Cancel
        } else {
            Confirmation::No
        };
        self.run(ConfirmModal::new(title, message, allow_cancel))
            .unwrap_or(fallback)
    }

    fn pick_font(&mut self, current: TextFont) -> Option<TextFont> {
        self.run(FontModal::new(current))
    }

    fn pick_color(&mut self, current: TextColor) -> Option<TextColor> {
        self.run(ColorModal::new(current))
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}
