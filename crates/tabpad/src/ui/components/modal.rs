//! Modal overlays standing in for the desktop file, confirmation, font, and color dialogs.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::dialogs::{Confirmation, FileDialogRequest};
use crate::domain::format::{TextColor, TextFont};
use crate::infra::fs::{self, DirEntry, FileFilter};
use crate::ui::components::editor::terminal_color;

/// What a modal wants after handling a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalStep<T> {
    Continue,
    /// `None` when the modal was dismissed.
    Close(Option<T>),
}

/// Interactive overlay driven by a nested event loop.
pub trait Modal {
    type Output;

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect);

    fn handle_key(&mut self, key: KeyEvent) -> ModalStep<Self::Output>;
}

/// Rectangle of `width` x `height` centred in `area`, clipped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn frame_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn is_plain(key: &KeyEvent) -> bool {
    !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Yes / No (/ Cancel) question.
#[derive(Debug, Clone)]
pub struct ConfirmModal {
    title: String,
    message: String,
    choices: Vec<Confirmation>,
    selected: usize,
}

impl ConfirmModal {
    pub fn new(title: &str, message: &str, allow_cancel: bool) -> Self {
        let mut choices = vec![Confirmation::Yes, Confirmation::No];
        if allow_cancel {
            choices.push(Confirmation::Cancel);
        }
        Self {
            title: title.to_string(),
            message: message.to_string(),
            choices,
            selected: 0,
        }
    }

    fn dismissed(&self) -> Confirmation {
        if self.choices.contains(&Confirmation::Cancel) {
            Confirmation::Cancel
        } else {
            Confirmation::No
        }
    }
}

fn choice_label(choice: Confirmation) -> &'static str {
    match choice {
        Confirmation::Yes => "[Y]es",
        Confirmation::No => "[N]o",
        Confirmation::Cancel => "[C]ancel",
    }
}

impl Modal for ConfirmModal {
    type Output = Confirmation;

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let popup = centered(area, 56, 7);
        frame.render_widget(Clear, popup);
        let block = frame_block(&self.title);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut buttons = Vec::new();
        for (index, choice) in self.choices.iter().enumerate() {
            let style = if index == self.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            buttons.push(Span::styled(choice_label(*choice), style));
            buttons.push(Span::raw("  "));
        }
        let text = vec![
            Line::from(self.message.clone()),
            Line::default(),
            Line::from(buttons),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModalStep<Confirmation> {
        let pick = |choice: Confirmation, choices: &[Confirmation]| {
            if choices.contains(&choice) {
                ModalStep::Close(Some(choice))
            } else {
                ModalStep::Continue
            }
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => pick(Confirmation::Yes, &self.choices),
            KeyCode::Char('n') | KeyCode::Char('N') => pick(Confirmation::No, &self.choices),
            KeyCode::Char('c') | KeyCode::Char('C') => pick(Confirmation::Cancel, &self.choices),
            KeyCode::Left | KeyCode::BackTab => {
                self.selected = (self.selected + self.choices.len() - 1) % self.choices.len();
                ModalStep::Continue
            }
            KeyCode::Right | KeyCode::Tab => {
                self.selected = (self.selected + 1) % self.choices.len();
                ModalStep::Continue
            }
            KeyCode::Enter => ModalStep::Close(Some(self.choices[self.selected])),
            KeyCode::Esc => ModalStep::Close(Some(self.dismissed())),
            _ => ModalStep::Continue,
        }
    }
}

/// Whether the file modal picks an existing file or a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Open,
    Save,
}

/// Directory browser with a file name field.
#[derive(Debug, Clone)]
pub struct FileModal {
    title: String,
    mode: FileMode,
    directory: PathBuf,
    filter: FileFilter,
    show_hidden: bool,
    entries: Vec<DirEntry>,
    list: ListState,
    input: String,
    error: Option<String>,
}

impl FileModal {
    pub fn new(mode: FileMode, request: &FileDialogRequest) -> Self {
        let mut modal = Self {
            title: request.title.clone(),
            mode,
            directory: request.initial_directory.clone(),
            filter: request.filter,
            show_hidden: request.show_hidden,
            entries: Vec::new(),
            list: ListState::default(),
            input: request.suggested_name.clone().unwrap_or_default(),
            error: None,
        };
        modal.reload();
        modal
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn filter(&self) -> FileFilter {
        self.filter
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn reload(&mut self) {
        self.entries.clear();
        if let Some(parent) = self.directory.parent() {
            self.entries.push(DirEntry {
                path: parent.to_path_buf(),
                name: "..".into(),
                is_dir: true,
            });
        }
        match fs::list_directory(&self.directory, self.filter, self.show_hidden) {
            Ok(entries) => {
                self.entries.extend(entries);
                self.error = None;
            }
            Err(err) => self.error = Some(format!("{err:#}")),
        }
        self.list.select(if self.entries.is_empty() { None } else { Some(0) });
    }

    fn enter_directory(&mut self, path: PathBuf) {
        self.directory = path;
        self.reload();
    }

    fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let current = self.list.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(self.entries.len() - 1);
        self.list.select(Some(next));
    }

    fn submit(&mut self) -> ModalStep<PathBuf> {
        if !self.input.trim().is_empty() {
            let candidate = self.directory.join(self.input.trim());
            if candidate.is_dir() {
                self.input.clear();
                self.enter_directory(candidate);
                return ModalStep::Continue;
            }
            if self.mode == FileMode::Open && !candidate.is_file() {
                self.error = Some(format!("{} does not exist", candidate.display()));
                return ModalStep::Continue;
            }
            return ModalStep::Close(Some(candidate));
        }

        let Some(entry) = self.list.selected().and_then(|idx| self.entries.get(idx)).cloned()
        else {
            return ModalStep::Continue;
        };
        if entry.is_dir {
            self.enter_directory(entry.path);
            return ModalStep::Continue;
        }
        match self.mode {
            FileMode::Open => ModalStep::Close(Some(entry.path)),
            FileMode::Save => {
                self.input = entry.name;
                ModalStep::Continue
            }
        }
    }
}

impl Modal for FileModal {
    type Output = PathBuf;

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let popup = centered(area, 72, 20);
        frame.render_widget(Clear, popup);
        let block = frame_block(&self.title);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let location = Paragraph::new(self.directory.display().to_string())
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(location, layout[0]);

        let items: Vec<ListItem<'_>> = self
            .entries
            .iter()
            .map(|entry| {
                if entry.is_dir {
                    ListItem::new(format!("{}/", entry.name))
                        .style(Style::default().fg(Color::Blue))
                } else {
                    ListItem::new(entry.name.clone())
                }
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, layout[1], &mut self.list);

        let name = Paragraph::new(format!("File name: {}", self.input));
        frame.render_widget(name, layout[2]);

        let footer = match &self.error {
            Some(error) => Line::styled(error.clone(), Style::default().fg(Color::Red)),
            None => Line::styled(
                format!("{} · Tab: change filter · Esc: cancel", self.filter.label()),
                Style::default().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(footer), layout[3]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModalStep<PathBuf> {
        match key.code {
            KeyCode::Esc => ModalStep::Close(None),
            KeyCode::Enter => self.submit(),
            KeyCode::Up => {
                self.move_selection(-1);
                ModalStep::Continue
            }
            KeyCode::Down => {
                self.move_selection(1);
                ModalStep::Continue
            }
            KeyCode::Tab => {
                self.filter = self.filter.toggled();
                self.reload();
                ModalStep::Continue
            }
            KeyCode::Backspace => {
                self.input.pop();
                ModalStep::Continue
            }
            KeyCode::Char(ch) if is_plain(&key) => {
                self.input.push(ch);
                self.error = None;
                ModalStep::Continue
            }
            _ => ModalStep::Continue,
        }
    }
}

const FONT_FLAGS: [&str; 3] = ["Bold", "Italic", "Underline"];

/// Toggles for the terminal font attributes.
#[derive(Debug, Clone)]
pub struct FontModal {
    font: TextFont,
    cursor: usize,
}

impl FontModal {
    pub fn new(current: TextFont) -> Self {
        Self {
            font: current,
            cursor: 0,
        }
    }

    fn flag(&self, index: usize) -> bool {
        match index {
            0 => self.font.bold,
            1 => self.font.italic,
            _ => self.font.underline,
        }
    }

    fn toggle(&mut self, index: usize) {
        match index {
            0 => self.font.bold = !self.font.bold,
            1 => self.font.italic = !self.font.italic,
            _ => self.font.underline = !self.font.underline,
        }
    }
}

impl Modal for FontModal {
    type Output = TextFont;

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let popup = centered(area, 40, 8);
        frame.render_widget(Clear, popup);
        let block = frame_block("Font");
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines: Vec<Line<'_>> = FONT_FLAGS
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let mark = if self.flag(index) { "[x]" } else { "[ ]" };
                let style = if index == self.cursor {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Line::styled(format!("{mark} {label}"), style)
            })
            .collect();
        lines.push(Line::default());
        lines.push(Line::styled(
            "Space: toggle · Enter: apply · Esc: cancel",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModalStep<TextFont> {
        match key.code {
            KeyCode::Esc => ModalStep::Close(None),
            KeyCode::Enter => ModalStep::Close(Some(self.font)),
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                ModalStep::Continue
            }
            KeyCode::Down => {
                self.cursor = (self.cursor + 1).min(FONT_FLAGS.len() - 1);
                ModalStep::Continue
            }
            KeyCode::Char(' ') => {
                self.toggle(self.cursor);
                ModalStep::Continue
            }
            KeyCode::Char('b') => {
                self.toggle(0);
                ModalStep::Continue
            }
            KeyCode::Char('i') => {
                self.toggle(1);
                ModalStep::Continue
            }
            KeyCode::Char('u') => {
                self.toggle(2);
                ModalStep::Continue
            }
            _ => ModalStep::Continue,
        }
    }
}

/// List of the named colors.
#[derive(Debug, Clone)]
pub struct ColorModal {
    list: ListState,
}

impl ColorModal {
    pub fn new(current: TextColor) -> Self {
        let index = TextColor::ALL
            .iter()
            .position(|color| *color == current)
            .unwrap_or(0);
        let mut list = ListState::default();
        list.select(Some(index));
        Self { list }
    }

    fn selected(&self) -> TextColor {
        TextColor::ALL[self.list.selected().unwrap_or(0)]
    }
}

impl Modal for ColorModal {
    type Output = TextColor;

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let height = TextColor::ALL.len() as u16 + 2;
        let popup = centered(area, 30, height);
        frame.render_widget(Clear, popup);

        let items: Vec<ListItem<'_>> = TextColor::ALL
            .iter()
            .map(|color| {
                let style = terminal_color(*color)
                    .map(|fg| Style::default().fg(fg))
                    .unwrap_or_default();
                ListItem::new(color.as_str()).style(style)
            })
            .collect();
        let list = List::new(items)
            .block(frame_block("Color"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, popup, &mut self.list);
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModalStep<TextColor> {
        let current = self.list.selected().unwrap_or(0);
        match key.code {
            KeyCode::Esc => ModalStep::Close(None),
            KeyCode::Enter => ModalStep::Close(Some(self.selected())),
            KeyCode::Up => {
                self.list.select(Some(current.saturating_sub(1)));
                ModalStep::Continue
            }
            KeyCode::Down => {
                self.list
                    .select(Some((current + 1).min(TextColor::ALL.len() - 1)));
                ModalStep::Continue
            }
            _ => ModalStep::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs as stdfs;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn request(dir: &Path, suggested: Option<&str>) -> FileDialogRequest {
        FileDialogRequest {
            title: "Test".into(),
            initial_directory: dir.to_path_buf(),
            filter: FileFilter::Text,
            show_hidden: false,
            suggested_name: suggested.map(str::to_string),
        }
    }

    #[test]
    fn confirm_without_cancel_maps_escape_to_no() {
        let mut modal = ConfirmModal::new("tabpad", "Quit?", false);
        assert_eq!(modal.handle_key(key(KeyCode::Char('c'))), ModalStep::Continue);
        assert_eq!(
            modal.handle_key(key(KeyCode::Esc)),
            ModalStep::Close(Some(Confirmation::No))
        );
    }

    #[test]
    fn confirm_navigation_wraps() {
        let mut modal = ConfirmModal::new("doc", "Save?", true);
        modal.handle_key(key(KeyCode::Left));
        assert_eq!(
            modal.handle_key(key(KeyCode::Enter)),
            ModalStep::Close(Some(Confirmation::Cancel))
        );
        assert_eq!(
            modal.handle_key(key(KeyCode::Char('y'))),
            ModalStep::Close(Some(Confirmation::Yes))
        );
    }

    #[test]
    fn open_modal_lists_filtered_entries_and_picks_file() {
        let temp = tempfile::tempdir().unwrap();
        stdfs::write(temp.path().join("a.txt"), "hello\n").unwrap();
        stdfs::write(temp.path().join("b.rs"), "").unwrap();

        let mut modal = FileModal::new(FileMode::Open, &request(temp.path(), None));
        let names: Vec<&str> = modal.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["..", "a.txt"]);

        modal.handle_key(key(KeyCode::Tab));
        assert_eq!(modal.filter(), FileFilter::All);
        assert_eq!(modal.entries().len(), 3);

        modal.handle_key(key(KeyCode::Down));
        assert_eq!(
            modal.handle_key(key(KeyCode::Enter)),
            ModalStep::Close(Some(temp.path().join("a.txt")))
        );
    }

    #[test]
    fn open_modal_rejects_missing_typed_file() {
        let temp = tempfile::tempdir().unwrap();
        let mut modal = FileModal::new(FileMode::Open, &request(temp.path(), None));
        for ch in "ghost.txt".chars() {
            modal.handle_key(key(KeyCode::Char(ch)));
        }
        assert_eq!(modal.handle_key(key(KeyCode::Enter)), ModalStep::Continue);
        assert!(modal.error().is_some());
    }

    #[test]
    fn save_modal_uses_suggested_name_and_navigates() {
        let temp = tempfile::tempdir().unwrap();
        stdfs::create_dir(temp.path().join("notes")).unwrap();

        let mut modal = FileModal::new(FileMode::Save, &request(temp.path(), Some("Untitled1")));
        for _ in 0.."Untitled1".len() {
            modal.handle_key(key(KeyCode::Backspace));
        }
        for ch in "notes".chars() {
            modal.handle_key(key(KeyCode::Char(ch)));
        }
        assert_eq!(modal.handle_key(key(KeyCode::Enter)), ModalStep::Continue);
        assert_eq!(modal.directory(), temp.path().join("notes"));

        for ch in "a.txt".chars() {
            modal.handle_key(key(KeyCode::Char(ch)));
        }
        assert_eq!(
            modal.handle_key(key(KeyCode::Enter)),
            ModalStep::Close(Some(temp.path().join("notes").join("a.txt")))
        );
    }

    #[test]
    fn font_and_color_modals() {
        let mut font = FontModal::new(TextFont::default());
        font.handle_key(key(KeyCode::Down));
        font.handle_key(key(KeyCode::Char(' ')));
        font.handle_key(key(KeyCode::Char('u')));
        let expected = TextFont {
            bold: false,
            italic: true,
            underline: true,
        };
        assert_eq!(font.handle_key(key(KeyCode::Enter)), ModalStep::Close(Some(expected)));

        let mut color = ColorModal::new(TextColor::Red);
        color.handle_key(key(KeyCode::Down));
        assert_eq!(
            color.handle_key(key(KeyCode::Enter)),
            ModalStep::Close(Some(TextColor::Green))
        );
        assert_eq!(color.handle_key(key(KeyCode::Esc)), ModalStep::Close(None));
    }
}
