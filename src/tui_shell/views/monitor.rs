use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};

use crate::model::resolved_pct;

use super::super::app::App;
use super::super::status::{RenderCtx, fmt_ts_list};
use super::{hint_span, render_view_chrome};

pub(crate) fn draw(frame: &mut ratatui::Frame, app: &App, area: Rect, ctx: &RenderCtx) {
    let target = app
        .poller
        .target()
        .map(|c| c.as_str().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let mut header = vec![
        Span::styled("Campaign", Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::raw(target),
        Span::raw("  "),
    ];
    if app.poller.is_paused() {
        header.push(Span::styled(
            "PAUSED",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        header.push(Span::raw("  "));
    }
    header.push(hint_span("Space pause/resume  Esc back"));

    let inner = render_view_chrome(frame, Line::from(header), area);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(inner);

    match app.aggregator.latest() {
        Some(snap) => {
            let pct = resolved_pct(snap);
            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("{:>5.1}%", pct),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(format!(
                        "  {} / {} jobs complete",
                        snap.completed, snap.total_jobs
                    )),
                    Span::raw("  "),
                    Span::styled(
                        fmt_ts_list(&snap.retrieved_at, ctx),
                        Style::default().fg(Color::Gray),
                    ),
                ]),
                Line::from(format!(
                    "pending {}  in-flight {}  sent {}  failed {}  dead {}",
                    snap.pending, snap.in_flight, snap.sent, snap.failed, snap.dead
                )),
                Line::from(vec![Span::styled(
                    format!(
                        "latency p50 {}ms  p95 {}ms  p99 {}ms",
                        snap.p50_ms, snap.p95_ms, snap.p99_ms
                    ),
                    Style::default().fg(Color::Gray),
                )]),
            ];
            frame.render_widget(Paragraph::new(lines), parts[0]);
        }
        None => {
            frame.render_widget(
                Paragraph::new(Line::from(hint_span("waiting for first snapshot"))),
                parts[0],
            );
        }
    }

    // Raw points, oldest first; no smoothing or gap-filling.
    let series: Vec<u64> = app
        .aggregator
        .history()
        .map(|p| p.completion_pct.clamp(0.0, 100.0).round() as u64)
        .collect();
    frame.render_widget(
        Sparkline::default()
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title("completion %"),
            )
            .data(&series)
            .max(100)
            .style(Style::default().fg(Color::Green)),
        parts[1],
    );
}
