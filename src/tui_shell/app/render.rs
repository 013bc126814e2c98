use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{App, EntryKind, fmt_ts_ui};
use crate::session::{Modal, Screen};
use crate::tui_shell::View;
use crate::tui_shell::modal::draw_modal;
use crate::tui_shell::views::{DuplicatesView, OrganizationView};

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    // Header
    let session = &app.session;
    let mut spans = vec![
        Span::styled(
            "permsort",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
    ];
    for screen in [Screen::Duplicates, Screen::Organization] {
        let style = if session.screen() == screen {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(screen.label(), style));
        spans.push(Span::raw("  "));
    }
    let pending = session.change_set().total();
    if pending > 0 {
        spans.push(Span::styled(
            format!("{} pending", pending),
            Style::default().fg(Color::Cyan),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match session.screen() {
        Screen::Duplicates => DuplicatesView { session }.render(frame, chunks[1]),
        Screen::Organization => OrganizationView { session }.render(frame, chunks[1]),
    }

    // Status / last result
    {
        let mut lines = Vec::new();
        if let Some(r) = &app.last_result {
            let style = match r.kind {
                EntryKind::Output => Style::default().fg(Color::White),
                EntryKind::Error => Style::default().fg(Color::Red),
            };
            for (i, l) in r.lines.iter().enumerate() {
                if i == 0 {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{} ", fmt_ts_ui(&r.ts)),
                            Style::default().fg(Color::Gray),
                        ),
                        Span::styled(l.as_str(), style),
                    ]));
                } else {
                    lines.push(Line::from(Span::styled(l.as_str(), style)));
                }
            }
        }
        if lines.is_empty() {
            lines.push(Line::from(""));
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::TOP).title("Last")),
            chunks[2],
        );
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            key_hints(app),
            Style::default().fg(Color::Gray),
        ))),
        chunks[3],
    );

    if let Some(modal) = session.modal() {
        draw_modal(frame, session, modal);
    }
}

fn key_hints(app: &App) -> &'static str {
    match (app.session.modal(), app.session.screen()) {
        (Some(Modal::Confirm { .. }), _) => "enter/y execute  esc/n cancel  up/down scroll  q quit",
        (Some(Modal::Dialog(_)), _) => "y yes  n no  q quit",
        (None, Screen::Duplicates) => {
            "tab organize  up/down select  1 local  2 repo  3 user  enter review  esc discard  q quit"
        }
        (None, Screen::Organization) => {
            "tab duplicates  left/right column  up/down row  1/2/3 move  enter review  esc reset  q quit"
        }
    }
}
