use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

pub(super) mod flows;
pub(super) mod monitor;

pub(super) fn render_view_chrome<'a>(
    frame: &mut ratatui::Frame,
    header: Line<'a>,
    area: Rect,
) -> Rect {
    let outer = Block::default().borders(Borders::ALL).title(header);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    inner
}

pub(super) fn hint_span(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::Gray))
}
