use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::model::{Duplicate, Level};
use crate::session::Session;

use super::super::{View, render_view_chrome};

pub(in crate::tui_shell) struct DuplicatesView<'a> {
    pub(in crate::tui_shell) session: &'a Session,
}

impl View for DuplicatesView<'_> {
    fn title(&self) -> &str {
        "Duplicates"
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let dups = self.session.duplicates();
        let note = if dups.is_empty() {
            "none".to_string()
        } else {
            format!("{} unresolved", dups.len())
        };
        let inner = render_view_chrome(frame, self.title(), &note, area);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(inner);

        let mut state = ListState::default();
        if !dups.is_empty() {
            state.select(Some(self.session.duplicate_cursor()));
        }

        let list = List::new(rows(dups))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .title("[keep] permission  (found in)"),
            )
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, parts[0], &mut state);

        frame.render_widget(
            Paragraph::new(detail_lines(self.session)).wrap(Wrap { trim: false }),
            parts[1],
        );
    }
}

fn rows(dups: &[Duplicate]) -> Vec<ListItem<'static>> {
    let mut rows = Vec::new();
    for d in dups {
        let keep = d.keep_level.map(|l| l.label()).unwrap_or("-");
        let mut spans = vec![
            Span::styled(format!("[{:<5}] ", keep), Style::default().fg(Color::Yellow)),
            Span::raw(d.name.clone()),
            Span::raw("  "),
        ];
        for (i, level) in d.levels.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(", "));
            }
            let style = if d.keep_level == Some(*level) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(level.label(), style));
        }
        rows.push(ListItem::new(Line::from(spans)));
    }
    if rows.is_empty() {
        rows.push(ListItem::new("(none)"));
    }
    rows
}

fn detail_lines(session: &Session) -> Vec<Line<'static>> {
    let Some(d) = session.selected_duplicate() else {
        return vec![
            Line::from("No permission is listed at more than one level."),
            Line::from("Tab switches to the organization screen."),
        ];
    };

    let mut lines = vec![Line::from(format!("{} is allowed at:", d.name))];
    for level in Level::ALL {
        if !d.levels.contains(&level) {
            continue;
        }
        let marker = match d.keep_level {
            Some(keep) if keep == level => "keep",
            Some(_) => "drop",
            None => "",
        };
        lines.push(Line::from(format!(
            "  {}  {:<5} {}",
            level.index() + 1,
            level.label(),
            marker
        )));
    }
    lines.push(Line::from(Span::styled(
        "Enter reviews and commits; organizing is blocked until duplicates are committed.",
        Style::default().fg(Color::Gray),
    )));
    lines
}
