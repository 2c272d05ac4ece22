use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use time::OffsetDateTime;

use crate::lifecycle::ModalState;

use super::app::{App, Screen};
use super::status::{RenderCtx, draw_toast_bar};
use super::{modal, views};

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    // Header: product tag, backend, shareable link state.
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Flowdeck",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
        Span::raw(app.base_url.as_str()),
        Span::raw("  "),
        Span::styled(
            format!("?{}", app.link.to_query()),
            Style::default().fg(Color::Cyan),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let ctx = RenderCtx {
        now: OffsetDateTime::now_utc(),
        ts_mode: app.ts_mode,
    };
    match app.screen {
        Screen::Flows => views::flows::draw(frame, app, chunks[1], &ctx),
        Screen::Monitor => views::monitor::draw(frame, app, chunks[1], &ctx),
    }

    draw_toast_bar(frame, &app.toasts, chunks[2]);

    if !matches!(app.controller.modal(), ModalState::Closed) {
        modal::draw_modal(frame, app);
    }
}
