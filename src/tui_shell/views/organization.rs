use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::model::{Level, Permission};
use crate::session::Session;

use super::super::{View, render_view_chrome};

pub(in crate::tui_shell) struct OrganizationView<'a> {
    pub(in crate::tui_shell) session: &'a Session,
}

impl View for OrganizationView<'_> {
    fn title(&self) -> &str {
        "Organization"
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let gated = self.session.has_unresolved_duplicates();
        let note = if gated {
            "locked until duplicates are committed"
        } else {
            "1 local  2 repo  3 user"
        };
        let inner = render_view_chrome(frame, self.title(), note, area);

        let body = if gated {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(inner);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(
                        "{} duplicate(s) unresolved: Tab back to Duplicates and commit first",
                        self.session.duplicates().len()
                    ),
                    Style::default().fg(Color::Red),
                ))),
                parts[0],
            );
            parts[1]
        } else {
            inner
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(body);

        for level in Level::ALL {
            self.render_column(frame, columns[level.index()], level, gated);
        }
    }
}

impl OrganizationView<'_> {
    fn render_column(&self, frame: &mut ratatui::Frame, area: Rect, level: Level, gated: bool) {
        let perms = self.session.permissions_in(level);
        let focused = !gated && self.session.focused_level() == level;

        let mut title = format!("{} ({})", level.label(), perms.len());
        if !self.session.is_present(level) {
            title.push_str(" (no file)");
        }
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut state = ListState::default();
        if focused && !perms.is_empty() {
            state.select(Some(self.session.selection(level)));
        }

        let list = List::new(rows(&perms))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(title),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn rows(perms: &[&Permission]) -> Vec<ListItem<'static>> {
    let mut rows: Vec<ListItem<'static>> = perms
        .iter()
        .map(|p| {
            if p.is_moved() {
                ListItem::new(Line::from(vec![
                    Span::styled(p.name.clone(), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("  <- {}", p.original_level()),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            } else {
                ListItem::new(p.name.clone())
            }
        })
        .collect();
    if rows.is_empty() {
        rows.push(ListItem::new("(empty)"));
    }
    rows
}
