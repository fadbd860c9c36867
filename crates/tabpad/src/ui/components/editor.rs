//! Text area for the active document: cursor movement, editing, and rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::domain::format::{TextColor, TextFormat};

/// A change to the text at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Newline,
    /// Insert spaces up to the next multiple of the tab width.
    Indent(usize),
    Backspace,
    Delete,
}

/// Cursor movements that never modify the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    PageUp(usize),
    PageDown(usize),
}

/// Per-document cursor and viewport. The cursor is a byte offset on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    cursor: usize,
    preferred_column: Option<usize>,
    top: usize,
    left: usize,
}

impl EditorState {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Zero-based (line, column) of the cursor, columns counted in chars.
    pub fn position(&self, content: &str) -> (usize, usize) {
        line_col(content, self.cursor.min(content.len()))
    }

    /// Keep the cursor valid after the content was replaced from outside (e.g. a file load).
    pub fn clamp(&mut self, content: &str) {
        if self.cursor > content.len() || !content.is_char_boundary(self.cursor) {
            self.cursor = content.len();
            self.preferred_column = None;
        }
    }

    /// Apply an edit and return the new content, or `None` when nothing changed.
    pub fn apply(&mut self, content: &str, action: EditAction) -> Option<String> {
        self.clamp(content);
        self.preferred_column = None;
        let at = self.cursor;
        match action {
            EditAction::Insert(ch) => {
                let mut text = String::with_capacity(content.len() + ch.len_utf8());
                text.push_str(&content[..at]);
                text.push(ch);
                text.push_str(&content[at..]);
                self.cursor = at + ch.len_utf8();
                Some(text)
            }
            EditAction::Newline => self.apply(content, EditAction::Insert('\n')),
            EditAction::Indent(width) => {
                let width = width.max(1);
                let (_, column) = line_col(content, at);
                let spaces = " ".repeat(width - column % width);
                self.cursor = at + spaces.len();
                Some(format!("{}{}{}", &content[..at], spaces, &content[at..]))
            }
            EditAction::Backspace => {
                let previous = content[..at].chars().next_back()?;
                let start = at - previous.len_utf8();
                self.cursor = start;
                Some(format!("{}{}", &content[..start], &content[at..]))
            }
            EditAction::Delete => {
                let next = content[at..].chars().next()?;
                Some(format!("{}{}", &content[..at], &content[at + next.len_utf8()..]))
            }
        }
    }

    pub fn move_cursor(&mut self, content: &str, motion: Motion) {
        self.clamp(content);
        let (line, column) = line_col(content, self.cursor);
        match motion {
            Motion::Left => {
                if let Some(previous) = content[..self.cursor].chars().next_back() {
                    self.cursor -= previous.len_utf8();
                }
                self.preferred_column = None;
            }
            Motion::Right => {
                if let Some(next) = content[self.cursor..].chars().next() {
                    self.cursor += next.len_utf8();
                }
                self.preferred_column = None;
            }
            Motion::Up => self.move_vertically(content, line, column, -1),
            Motion::Down => self.move_vertically(content, line, column, 1),
            Motion::PageUp(rows) => self.move_vertically(content, line, column, -(rows as isize)),
            Motion::PageDown(rows) => self.move_vertically(content, line, column, rows as isize),
            Motion::LineStart => {
                self.cursor = line_bounds(content, line).0;
                self.preferred_column = None;
            }
            Motion::LineEnd => {
                self.cursor = line_bounds(content, line).1;
                self.preferred_column = None;
            }
        }
    }

    fn move_vertically(&mut self, content: &str, line: usize, column: usize, delta: isize) {
        let last_line = content.matches('\n').count();
        let target = line.saturating_add_signed(delta).min(last_line);
        let wanted = *self.preferred_column.get_or_insert(column);
        self.cursor = offset_for(content, target, wanted);
    }

    /// Scroll so the cursor stays inside a viewport of `height` rows by `width` columns.
    fn scroll_into_view(&mut self, content: &str, height: usize, width: usize) {
        let (line, column) = self.position(content);
        if line < self.top {
            self.top = line;
        } else if height > 0 && line >= self.top + height {
            self.top = line + 1 - height;
        }
        if column < self.left {
            self.left = column;
        } else if width > 0 && column >= self.left + width {
            self.left = column + 1 - width;
        }
    }
}

fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    (line, content[line_start..offset].chars().count())
}

/// Byte range of `line`, excluding its newline.
fn line_bounds(content: &str, line: usize) -> (usize, usize) {
    let mut start = 0;
    for _ in 0..line {
        match content[start..].find('\n') {
            Some(idx) => start += idx + 1,
            None => return (content.len(), content.len()),
        }
    }
    let end = content[start..]
        .find('\n')
        .map(|idx| start + idx)
        .unwrap_or(content.len());
    (start, end)
}

fn offset_for(content: &str, line: usize, column: usize) -> usize {
    let (start, end) = line_bounds(content, line);
    content[start..end]
        .char_indices()
        .nth(column)
        .map(|(idx, _)| start + idx)
        .unwrap_or(end)
}

/// Style applied to document text for the window's font and color.
pub fn text_style(format: TextFormat) -> Style {
    let mut style = Style::default();
    if let Some(color) = terminal_color(format.color) {
        style = style.fg(color);
    }
    if format.font.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if format.font.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if format.font.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

pub fn terminal_color(color: TextColor) -> Option<Color> {
    match color {
        TextColor::Default => None,
        TextColor::Black => Some(Color::Black),
        TextColor::Red => Some(Color::Red),
        TextColor::Green => Some(Color::Green),
        TextColor::Yellow => Some(Color::Yellow),
        TextColor::Blue => Some(Color::Blue),
        TextColor::Magenta => Some(Color::Magenta),
        TextColor::Cyan => Some(Color::Cyan),
        TextColor::Gray => Some(Color::Gray),
        TextColor::White => Some(Color::White),
    }
}

/// Renders the active document's text and places the terminal cursor.
#[derive(Debug, Default)]
pub struct TextArea;

impl TextArea {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        content: &str,
        format: TextFormat,
        state: &mut EditorState,
    ) {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        state.clamp(content);
        state.scroll_into_view(content, inner.height as usize, inner.width as usize);

        let lines: Vec<Line<'_>> = content.split('\n').map(Line::raw).collect();
        let top = u16::try_from(state.top).unwrap_or(u16::MAX);
        let left = u16::try_from(state.left).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(lines)
            .style(text_style(format))
            .scroll((top, left));
        frame.render_widget(paragraph, inner);

        let (line, column) = state.position(content);
        let x = inner.x as usize + column - state.left;
        let y = inner.y as usize + line - state.top;
        if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) {
            frame.set_cursor(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut EditorState, content: &str, text: &str) -> String {
        let mut current = content.to_string();
        for ch in text.chars() {
            let action = if ch == '\n' {
                EditAction::Newline
            } else {
                EditAction::Insert(ch)
            };
            current = state.apply(&current, action).expect("insert changes text");
        }
        current
    }

    #[test]
    fn typing_and_backspace() {
        let mut state = EditorState::default();
        let text = type_text(&mut state, "", "héllo\nworld");
        assert_eq!(text, "héllo\nworld");
        assert_eq!(state.position(&text), (1, 5));

        let text = state.apply(&text, EditAction::Backspace).unwrap();
        assert_eq!(text, "héllo\nworl");
    }

    #[test]
    fn edits_at_boundaries_report_no_change() {
        let mut state = EditorState::default();
        assert_eq!(state.apply("abc", EditAction::Backspace), None);
        state.move_cursor("abc", Motion::LineEnd);
        assert_eq!(state.apply("abc", EditAction::Delete), None);
    }

    #[test]
    fn vertical_motion_keeps_preferred_column() {
        let content = "long line\nab\nanother line";
        let mut state = EditorState::default();
        state.move_cursor(content, Motion::LineEnd);
        state.move_cursor(content, Motion::Down);
        assert_eq!(state.position(content), (1, 2));
        state.move_cursor(content, Motion::Down);
        assert_eq!(state.position(content), (2, 9));
        state.move_cursor(content, Motion::PageUp(10));
        assert_eq!(state.position(content), (0, 9));
    }

    #[test]
    fn indent_aligns_to_tab_width() {
        let mut state = EditorState::default();
        let text = type_text(&mut state, "", "ab");
        let text = state.apply(&text, EditAction::Indent(4)).unwrap();
        assert_eq!(text, "ab  ");
        assert_eq!(state.cursor(), 4);
    }

    #[test]
    fn clamp_recovers_after_external_replace() {
        let mut state = EditorState::default();
        let text = type_text(&mut state, "", "some longer text");
        state.clamp("short");
        assert_eq!(state.cursor(), "short".len());
        assert!(state.cursor() <= text.len());
    }

    #[test]
    fn style_reflects_format() {
        let mut format = TextFormat::default();
        format.font.bold = true;
        format.color = TextColor::Red;
        let style = text_style(format);
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
