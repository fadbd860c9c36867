//! Command palette: the menu bar of the terminal UI.

use std::path::PathBuf;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::domain::format::{TextColor, TextFont};

pub const HELP_TEXT: &str = "Commands: new, window, open [path], save, saveas, saveall, close, \
font [flags], color [name], next, prev, exit, quit";

/// A parsed palette command. Each maps to one menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteCommand {
    New,
    NewWindow,
    Open(Option<PathBuf>),
    Save,
    SaveAs,
    SaveAll,
    Close,
    Font(Option<TextFont>),
    Color(Option<TextColor>),
    NextTab,
    PreviousTab,
    Exit,
    QuitAll,
    Help,
}

impl PaletteCommand {
    /// Parse palette input. An empty line yields `Ok(None)`.
    pub fn parse(input: &str) -> Result<Option<Self>, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "new" => PaletteCommand::New,
            "window" | "new-window" => PaletteCommand::NewWindow,
            "open" => PaletteCommand::Open((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "save" => PaletteCommand::Save,
            "saveas" | "save-as" => PaletteCommand::SaveAs,
            "saveall" | "save-all" => PaletteCommand::SaveAll,
            "close" => PaletteCommand::Close,
            "font" if rest.is_empty() => PaletteCommand::Font(None),
            "font" => PaletteCommand::Font(Some(
                TextFont::parse_flags(rest).map_err(|err| err.to_string())?,
            )),
            "color" if rest.is_empty() => PaletteCommand::Color(None),
            "color" => PaletteCommand::Color(Some(
                rest.parse::<TextColor>().map_err(|err| err.to_string())?,
            )),
            "next" => PaletteCommand::NextTab,
            "prev" | "previous" => PaletteCommand::PreviousTab,
            "exit" => PaletteCommand::Exit,
            "quit" => PaletteCommand::QuitAll,
            "help" => PaletteCommand::Help,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(Some(command))
    }
}

/// Input buffer backing the palette overlay.
#[derive(Debug, Default, Clone)]
pub struct CommandPaletteState {
    visible: bool,
    input: String,
}

impl CommandPaletteState {
    pub fn open(&mut self) {
        self.visible = true;
        self.input.clear();
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Consume the current input, leaving the buffer empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }
}

#[derive(Debug, Default)]
pub struct CommandPalette;

impl CommandPalette {
    /// Draw the palette along the bottom of `area` if it is visible.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &CommandPaletteState) {
        if !state.is_open() {
            return;
        }

        let width = area.width.saturating_sub(10).min(80);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height.saturating_sub(4),
            width,
            height: 3.min(area.height),
        };

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title("Command")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let prompt = Paragraph::new(format!(":{}", state.input()))
            .style(Style::default().fg(Color::White))
            .block(block);
        frame.render_widget(prompt, popup);
    }
}
