use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem};

use crate::model::FlowTab;

use super::super::app::App;
use super::super::status::{RenderCtx, fmt_ts_list};
use super::{hint_span, render_view_chrome};

pub(crate) fn draw(frame: &mut ratatui::Frame, app: &App, area: Rect, ctx: &RenderCtx) {
    let tab = app.controller.tab();
    let mut header = vec![Span::styled("Flows", Style::default().fg(Color::Yellow))];
    for t in [FlowTab::Published, FlowTab::Draft] {
        header.push(Span::raw("  "));
        let style = if t == tab {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        header.push(Span::styled(format!(" {} ", t.as_str()), style));
    }
    header.push(Span::raw("  "));
    header.push(hint_span("Tab switch  p publish  d delete  r refresh  m monitor"));

    let inner = render_view_chrome(frame, Line::from(header), area);

    let flows = app.controller.current();
    if flows.is_empty() {
        frame.render_widget(
            List::new([ListItem::new(Line::from(hint_span("(no flows)")))]),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = flows
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let busy = app.controller.is_busy(&f.id);
            let marker = if busy { "… " } else { "  " };
            let mut style = Style::default();
            if i == app.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if busy {
                // Triggers for this row are disabled while an operation is
                // outstanding.
                style = style.fg(Color::DarkGray);
            }
            let updated = f.updated_at.as_deref().unwrap_or(&f.created_at);
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<28}", f.name), style),
                Span::raw("  "),
                Span::styled(f.id.as_str(), Style::default().fg(Color::Gray)),
                Span::raw("  "),
                Span::styled(
                    fmt_ts_list(updated, ctx),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}
