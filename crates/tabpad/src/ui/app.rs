//! Application loop for the TUI.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tracing::{info, warn};

use crate::app::dialogs::{Dialogs, NoticeLevel};
use crate::app::session::Outcome;
use crate::app::workspace::Workspace;
use crate::domain::errors::DocumentError;
use crate::domain::format::TextFormat;
use crate::domain::model::DocumentId;
use crate::infra::config::Config;
use crate::ui::components::command_palette::{
    CommandPalette, CommandPaletteState, HELP_TEXT, PaletteCommand,
};
use crate::ui::components::editor::{EditAction, EditorState, Motion, TextArea};
use crate::ui::components::tab_bar::TabBar;
use crate::ui::dialogs::TerminalDialogs;

const TICK_RATE: Duration = Duration::from_millis(120);

/// Primary entry point for running the interactive TUI.
pub struct UiApp {
    config: Config,
    workspace: Workspace,
    editors: HashMap<DocumentId, EditorState>,
    palette_state: CommandPaletteState,
    palette: CommandPalette,
    tab_bar: TabBar,
    text_area: TextArea,
    viewport_rows: usize,
    status: Option<StatusMessage>,
}

impl UiApp {
    pub fn new(config: Config) -> Self {
        let workspace = Workspace::new(&config);
        Self {
            config,
            workspace,
            editors: HashMap::new(),
            palette_state: CommandPaletteState::default(),
            palette: CommandPalette,
            tab_bar: TabBar,
            text_area: TextArea,
            viewport_rows: 1,
            status: None,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Open files named on the command line, each in its own tab of the first window.
    pub fn open_files(&mut self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(err) = self.workspace.open_path(path) {
                self.report_error(&err);
            }
        }
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;

        info!("tabpad started");
        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(
            terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = terminal.show_cursor();

        event_loop_result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.workspace.is_finished() {
                info!("last window closed");
                break;
            }

            if event::poll(TICK_RATE)? {
                let ev = event::read()?;
                self.handle_event(terminal, ev);
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(size);

        let Some(session) = self.workspace.active_session() else {
            return;
        };
        self.tab_bar.render(frame, layout[0], session);
        if let Some(document) = session.active() {
            let editor = self.editors.entry(document.id()).or_default();
            self.text_area.render(
                frame,
                layout[1],
                document.content(),
                session.format(),
                editor,
            );
        }
        self.viewport_rows = usize::from(layout[1].height.saturating_sub(1)).max(1);

        self.render_status(frame, layout[2]);
        self.palette.render(frame, size, &self.palette_state);
    }

    fn render_status(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let line = match &self.status {
            Some(status) => {
                let style = match status.level {
                    NoticeLevel::Info => Style::default().fg(Color::Gray),
                    NoticeLevel::Success => Style::default().fg(Color::Green),
                    NoticeLevel::Error => Style::default().fg(Color::Red),
                };
                Line::styled(status.text.clone(), style)
            }
            None => Line::from(vec![
                Span::styled("ctrl+p", Style::default().fg(Color::Cyan)),
                Span::raw(" commands · "),
                Span::styled("ctrl+s", Style::default().fg(Color::Cyan)),
                Span::raw(" save · "),
                Span::styled("ctrl+q", Style::default().fg(Color::Cyan)),
                Span::raw(" exit · "),
                Span::styled(self.position_label(), Style::default().fg(Color::DarkGray)),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn position_label(&self) -> String {
        let window = format!(
            "window {}/{}",
            self.workspace.active_index() + 1,
            self.workspace.window_count()
        );
        let Some(document) = self
            .workspace
            .active_session()
            .and_then(|session| session.active())
        else {
            return window;
        };
        let (line, column) = self
            .editors
            .get(&document.id())
            .map(|editor| editor.position(document.content()))
            .unwrap_or((0, 0));
        let location = document
            .file_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| document.display_name());
        format!("{window} · {location} · Ln {}, Col {}", line + 1, column + 1)
    }

    fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }

        let open: HashSet<DocumentId> = self
            .workspace
            .windows()
            .iter()
            .flat_map(|session| session.documents().iter().map(|doc| doc.id()))
            .collect();
        self.editors.retain(|id, _| open.contains(id));
    }

    fn handle_event<B: Backend>(&mut self, terminal: &mut Terminal<B>, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(terminal, key),
            Event::Paste(text) => self.paste(&text),
            _ => {}
        }
    }

    fn handle_key<B: Backend>(&mut self, terminal: &mut Terminal<B>, key: KeyEvent) {
        if self.palette_state.is_open() {
            self.handle_palette_key(terminal, key);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('p') {
            self.palette_state.open();
            return;
        }
        if key.code == KeyCode::F(2) {
            self.workspace.focus_next_window();
            return;
        }
        if let Some(command) = command_for_key(&key) {
            self.execute(terminal, command);
            return;
        }

        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(ch) if plain => self.edit_active(EditAction::Insert(ch)),
            KeyCode::Enter => self.edit_active(EditAction::Newline),
            KeyCode::Tab => self.edit_active(EditAction::Indent(self.config.editor.tab_width)),
            KeyCode::Backspace => self.edit_active(EditAction::Backspace),
            KeyCode::Delete => self.edit_active(EditAction::Delete),
            KeyCode::Left => self.move_active(Motion::Left),
            KeyCode::Right => self.move_active(Motion::Right),
            KeyCode::Up => self.move_active(Motion::Up),
            KeyCode::Down => self.move_active(Motion::Down),
            KeyCode::Home => self.move_active(Motion::LineStart),
            KeyCode::End => self.move_active(Motion::LineEnd),
            KeyCode::PageUp => self.move_active(Motion::PageUp(self.viewport_rows)),
            KeyCode::PageDown => self.move_active(Motion::PageDown(self.viewport_rows)),
            _ => {}
        }
    }

    fn handle_palette_key<B: Backend>(&mut self, terminal: &mut Terminal<B>, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.palette_state.close(),
            KeyCode::Enter => {
                let input = self.palette_state.take_input();
                self.palette_state.close();
                match PaletteCommand::parse(&input) {
                    Ok(Some(command)) => self.execute(terminal, command),
                    Ok(None) => {}
                    Err(message) => self.set_status(NoticeLevel::Error, message),
                }
            }
            KeyCode::Backspace => self.palette_state.pop_char(),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.palette_state.push_char(ch);
            }
            _ => {}
        }
    }

    fn execute<B: Backend>(&mut self, terminal: &mut Terminal<B>, command: PaletteCommand) {
        match command {
            PaletteCommand::New => {
                if let Some((session, namer)) = self.workspace.active_parts() {
                    session.new_document(namer);
                }
            }
            PaletteCommand::NewWindow => {
                self.workspace.new_window();
            }
            PaletteCommand::Open(None) => {
                let result = self.with_dialogs(terminal, |workspace, dialogs| {
                    match workspace.active_parts() {
                        Some((session, namer)) => session.open_with_dialog(namer, dialogs),
                        None => Ok(Outcome::Unchanged),
                    }
                });
                self.report(result);
            }
            PaletteCommand::Open(Some(path)) => match self.workspace.open_path(&path) {
                Ok(()) => self.report(Ok(Outcome::Opened(path))),
                Err(err) => self.report_error(&err),
            },
            PaletteCommand::Save => self.save_active(terminal, false),
            PaletteCommand::SaveAs => self.save_active(terminal, true),
            PaletteCommand::SaveAll => {
                let result = self.with_dialogs(terminal, |workspace, dialogs| {
                    match workspace.active_session_mut() {
                        Some(session) => session.save_all(dialogs),
                        None => Ok(()),
                    }
                });
                match result {
                    Ok(()) => self.set_status(NoticeLevel::Success, "All documents saved"),
                    Err(err) => self.report_error(&err),
                }
            }
            PaletteCommand::Close => {
                self.with_dialogs(terminal, |workspace, dialogs| {
                    if let Some((session, namer)) = workspace.active_parts()
                        && let Some(id) = session.active_id()
                    {
                        // A cancelled close keeps the tab; nothing to report.
                        let _ = session.close_document(id, namer, dialogs);
                    }
                });
            }
            PaletteCommand::Font(choice) => {
                let font = self.with_dialogs(terminal, |workspace, dialogs| {
                    let session = workspace.active_session_mut()?;
                    match choice {
                        Some(font) => {
                            session.apply_format(TextFormat {
                                font,
                                ..session.format()
                            });
                            Some(font)
                        }
                        None => session.choose_font(dialogs).ok(),
                    }
                });
                if let Some(font) = font {
                    self.set_status(NoticeLevel::Info, format!("Font: {font}"));
                }
            }
            PaletteCommand::Color(choice) => {
                let color = self.with_dialogs(terminal, |workspace, dialogs| {
                    let session = workspace.active_session_mut()?;
                    match choice {
                        Some(color) => {
                            session.apply_format(TextFormat {
                                color,
                                ..session.format()
                            });
                            Some(color)
                        }
                        None => session.choose_color(dialogs).ok(),
                    }
                });
                if let Some(color) = color {
                    self.set_status(NoticeLevel::Info, format!("Color: {color}"));
                }
            }
            PaletteCommand::NextTab => {
                if let Some(session) = self.workspace.active_session_mut() {
                    session.select_next();
                }
            }
            PaletteCommand::PreviousTab => {
                if let Some(session) = self.workspace.active_session_mut() {
                    session.select_previous();
                }
            }
            PaletteCommand::Exit => {
                self.with_dialogs(terminal, |workspace, dialogs| {
                    let _ = workspace.exit(dialogs);
                });
            }
            PaletteCommand::QuitAll => {
                self.with_dialogs(terminal, |workspace, dialogs| {
                    let _ = workspace.quit_all(dialogs);
                });
            }
            PaletteCommand::Help => self.set_status(NoticeLevel::Info, HELP_TEXT),
        }
    }

    fn save_active<B: Backend>(&mut self, terminal: &mut Terminal<B>, save_as: bool) {
        let result = self.with_dialogs(terminal, |workspace, dialogs| {
            let Some(session) = workspace.active_session_mut() else {
                return Ok(Outcome::Unchanged);
            };
            let Some(id) = session.active_id() else {
                return Ok(Outcome::Unchanged);
            };
            if save_as {
                session.save_as(id, dialogs)
            } else {
                session.save(id, dialogs)
            }
        });
        self.report(result);
    }

    /// Run `op` with terminal-backed dialogs; notifications raised meanwhile land in the status
    /// line.
    fn with_dialogs<B: Backend, R>(
        &mut self,
        terminal: &mut Terminal<B>,
        op: impl FnOnce(&mut Workspace, &mut dyn Dialogs) -> R,
    ) -> R {
        let mut dialogs = TerminalDialogs::new(terminal);
        let result = op(&mut self.workspace, &mut dialogs);
        for (level, message) in dialogs.into_notices() {
            self.set_status(level, message);
        }
        result
    }

    fn edit_active(&mut self, action: EditAction) {
        let Some(session) = self.workspace.active_session_mut() else {
            return;
        };
        let Some(document) = session.active() else {
            return;
        };
        let id = document.id();
        let editor = self.editors.entry(id).or_default();
        let Some(updated) = editor.apply(document.content(), action) else {
            return;
        };
        if let Err(err) = session.edit(id, updated) {
            warn!(error = %err, "edit rejected");
        }
    }

    /// Insert pasted text verbatim. Tabs stay tabs; `\r\n` and lone `\r` become `\n`.
    fn paste(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for ch in normalized.chars() {
            let action = if ch == '\n' {
                EditAction::Newline
            } else {
                EditAction::Insert(ch)
            };
            self.edit_active(action);
        }
    }

    fn move_active(&mut self, motion: Motion) {
        let Some(document) = self
            .workspace
            .active_session()
            .and_then(|session| session.active())
        else {
            return;
        };
        self.editors
            .entry(document.id())
            .or_default()
            .move_cursor(document.content(), motion);
    }

    fn report(&mut self, result: Result<Outcome, DocumentError>) {
        match result {
            Ok(Outcome::Saved(path)) => {
                self.set_status(NoticeLevel::Success, format!("Saved {}", path.display()));
            }
            Ok(Outcome::Opened(path)) => {
                self.set_status(NoticeLevel::Success, format!("Opened {}", path.display()));
            }
            Ok(Outcome::Unchanged) => self.set_status(NoticeLevel::Info, "No changes to save"),
            Ok(Outcome::Cancelled) => {}
            Err(err) => self.report_error(&err),
        }
    }

    fn report_error(&mut self, err: &DocumentError) {
        warn!(error = %err, "document operation failed");
        self.set_status(NoticeLevel::Error, err.to_string());
    }

    fn set_status<S: Into<String>>(&mut self, level: NoticeLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }
}

/// Menu shortcut bound to `key`, if any.
pub fn command_for_key(key: &KeyEvent) -> Option<PaletteCommand> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char(ch) if ctrl => match ch.to_ascii_lowercase() {
            'n' if shift || ch.is_ascii_uppercase() => Some(PaletteCommand::NewWindow),
            'n' => Some(PaletteCommand::New),
            'o' => Some(PaletteCommand::Open(None)),
            's' if shift || ch.is_ascii_uppercase() => Some(PaletteCommand::SaveAs),
            's' => Some(PaletteCommand::Save),
            'w' => Some(PaletteCommand::Close),
            'q' => Some(PaletteCommand::Exit),
            'c' => Some(PaletteCommand::QuitAll),
            _ => None,
        },
        KeyCode::Char(ch) if alt => match ch.to_ascii_lowercase() {
            'n' => Some(PaletteCommand::NewWindow),
            's' => Some(PaletteCommand::SaveAs),
            'f' => Some(PaletteCommand::Font(None)),
            'c' => Some(PaletteCommand::Color(None)),
            _ => None,
        },
        KeyCode::Right if alt => Some(PaletteCommand::NextTab),
        KeyCode::Left if alt => Some(PaletteCommand::PreviousTab),
        KeyCode::PageDown if ctrl => Some(PaletteCommand::NextTab),
        KeyCode::PageUp if ctrl => Some(PaletteCommand::PreviousTab),
        _ => None,
    }
}

#[derive(Debug)]
struct StatusMessage {
    level: NoticeLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: NoticeLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
