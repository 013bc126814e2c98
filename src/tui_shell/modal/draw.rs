use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::session::{DialogAction, Modal, Session};

pub(in crate::tui_shell) fn draw_modal(frame: &mut ratatui::Frame, session: &Session, modal: &Modal) {
    match modal {
        Modal::Confirm { scroll } => draw_confirm(frame, session, *scroll),
        Modal::Dialog(action) => draw_dialog(frame, *action),
    }
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

fn draw_confirm(frame: &mut ratatui::Frame, session: &Session, scroll: usize) {
    let area = frame.area();
    let box_area = centered(
        area,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    );
    frame.render_widget(Clear, box_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(modal_title("Confirm changes", &["Esc", "Enter"]));
    frame.render_widget(block.clone(), box_area);
    let inner = block.inner(box_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let summary = session.change_set().summary_lines();
    let lines: Vec<Line> = summary.iter().map(|s| Line::from(s.as_str())).collect();
    let scroll = scroll.min(summary.len().saturating_sub(1)) as u16;
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        parts[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "execute writes the settings files",
            Style::default().fg(Color::Gray),
        ))),
        parts[1],
    );
}

fn draw_dialog(frame: &mut ratatui::Frame, action: DialogAction) {
    let box_area = centered(frame.area(), 40, 6);
    frame.render_widget(Clear, box_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(modal_title(action.title(), &["y", "n"]));
    frame.render_widget(block.clone(), box_area);
    let inner = block.inner(box_area);

    let lines = vec![
        Line::from(action.prompt()),
        Line::from(""),
        Line::from(Span::styled(
            "y yes   n no   q quit",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn modal_title(title: &str, keys: &[&str]) -> Line<'static> {
    let mut spans = vec![Span::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow),
    )];
    for k in keys {
        spans.push(Span::raw("  ".to_string()));
        spans.push(Span::styled(k.to_string(), Style::default().fg(Color::Gray)));
    }
    Line::from(spans)
}
