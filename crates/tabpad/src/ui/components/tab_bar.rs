//! Tab strip for the documents of the active window.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Tabs;

use crate::app::session::Session;

/// Titles in session order, dirty documents prefixed with `*`.
pub fn tab_titles(session: &Session) -> Vec<String> {
    session
        .documents()
        .iter()
        .map(|document| document.tab_title())
        .collect()
}

#[derive(Debug, Default)]
pub struct TabBar;

impl TabBar {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, session: &Session) {
        let titles: Vec<Line<'static>> = tab_titles(session).into_iter().map(Line::from).collect();
        let tabs = Tabs::new(titles)
            .select(session.active_index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
            .divider("│");
        frame.render_widget(tabs, area);
    }
}
