//! Timestamp formatting and the toast/status bar.

use std::sync::OnceLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;

use crate::toast::{Toast, ToastKind, Toasts};

use super::app::TimestampMode;

#[derive(Clone, Copy, Debug)]
pub(super) struct RenderCtx {
    pub(super) now: OffsetDateTime,
    pub(super) ts_mode: TimestampMode,
}

fn ts_ui_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]Z",
        )
        .expect("valid time format")
    })
}

fn fmt_ts_abs(ts: &str) -> Option<String> {
    let dt = OffsetDateTime::parse(ts, &Rfc3339).ok()?;
    dt.format(ts_ui_format()).ok()
}

fn fmt_since(ts: &str, now: OffsetDateTime) -> Option<String> {
    let dt = OffsetDateTime::parse(ts, &Rfc3339).ok()?;
    let secs = (now - dt).whole_seconds();
    if secs < 0 {
        return None;
    }

    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    let s = if secs < 60 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{}m ago", mins)
    } else if hours < 48 {
        format!("{}h ago", hours)
    } else if days < 14 {
        format!("{}d ago", days)
    } else {
        return None;
    };
    Some(s)
}

pub(super) fn fmt_ts_ui(ts: &str) -> String {
    fmt_ts_abs(ts).unwrap_or_else(|| ts.to_string())
}

pub(super) fn fmt_ts_list(ts: &str, ctx: &RenderCtx) -> String {
    match ctx.ts_mode {
        TimestampMode::Relative => fmt_since(ts, ctx.now).unwrap_or_else(|| fmt_ts_ui(ts)),
        TimestampMode::Absolute => fmt_ts_ui(ts),
    }
}

fn toast_style(t: &Toast) -> Style {
    match t.kind {
        ToastKind::Success => Style::default().fg(Color::Green),
        ToastKind::Error => Style::default().fg(Color::Red),
        ToastKind::Info => Style::default().fg(Color::White),
    }
}

/// Bottom bar: the most recent toast, timestamped and kind-colored.
pub(super) fn draw_toast_bar(
    frame: &mut ratatui::Frame,
    toasts: &Toasts,
    area: ratatui::layout::Rect,
) {
    let lines = match toasts.latest() {
        Some(t) => vec![Line::from(vec![
            Span::styled(
                format!("{} ", fmt_ts_ui(&t.ts)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(t.text.as_str(), toast_style(t)),
        ])],
        None => vec![Line::from("")],
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP).title("Last")),
        area,
    );
}
