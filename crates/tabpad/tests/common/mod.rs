#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;

use tabpad::app::dialogs::{Confirmation, Dialogs, FileDialogRequest, NoticeLevel};
use tabpad::domain::format::{TextColor, TextFont};

/// Dialogs answering from pre-recorded scripts and recording what was asked.
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    pub open_paths: VecDeque<Option<PathBuf>>,
    pub save_paths: VecDeque<Option<PathBuf>>,
    pub answers: VecDeque<Confirmation>,
    pub fonts: VecDeque<Option<TextFont>>,
    pub colors: VecDeque<Option<TextColor>>,
    pub prompts: Vec<(String, String)>,
    pub save_requests: Vec<FileDialogRequest>,
    pub open_requests: Vec<FileDialogRequest>,
    pub notices: Vec<(NoticeLevel, String)>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, answer: Confirmation) -> Self {
        self.answers.push_back(answer);
        self
    }

    pub fn save_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_paths.push_back(Some(path.into()));
        self
    }

    pub fn cancel_save(mut self) -> Self {
        self.save_paths.push_back(None);
        self
    }

    pub fn open(mut self, path: impl Into<PathBuf>) -> Self {
        self.open_paths.push_back(Some(path.into()));
        self
    }
}

impl Dialogs for ScriptedDialogs {
    fn pick_open_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
        self.open_requests.push(request.clone());
        self.open_paths.pop_front().flatten()
    }

    fn pick_save_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
        self.save_requests.push(request.clone());
        self.save_paths.pop_front().flatten()
    }

    fn confirm(&mut self, title: &str, message: &str, _allow_cancel: bool) -> Confirmation {
        self.prompts.push((title.to_string(), message.to_string()));
        self.answers
            .pop_front()
            .expect("unexpected confirmation prompt")
    }

    fn pick_font(&mut self, _current: TextFont) -> Option<TextFont> {
        self.fonts.pop_front().flatten()
    }

    fn pick_color(&mut self, _current: TextColor) -> Option<TextColor> {
        self.colors.pop_front().flatten()
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}
