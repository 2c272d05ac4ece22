//! The delete modal: confirm mode with the double gate, attached mode as a
//! read-only listing of blocking campaigns.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::lifecycle::ModalState;
use crate::model::CampaignRef;

use super::app::App;
use super::status::fmt_ts_ui;

pub(super) fn draw_modal(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let w = area.width.saturating_sub(6).clamp(30, 90);
    let h = area.height.saturating_sub(6).clamp(9, 20);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    let box_area = Rect {
        x,
        y,
        width: w,
        height: h,
    };

    frame.render_widget(Clear, box_area);

    match app.controller.modal() {
        ModalState::Confirm { flow, gate } => {
            let busy = app.controller.is_busy(&flow.id);
            let block = Block::default().borders(Borders::ALL).title(Line::from(vec![
                Span::styled("Delete flow", Style::default().fg(Color::Red)),
                Span::raw("  "),
                Span::styled("Esc", Style::default().fg(Color::Gray)),
            ]));
            frame.render_widget(block.clone(), box_area);
            let inner = block.inner(box_area);

            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(inner);

            let check = if gate.acknowledged { "[x]" } else { "[ ]" };
            let open = gate.is_open(&flow.name);
            let action_line = if busy {
                Line::from(Span::styled(
                    "deleting…",
                    Style::default().fg(Color::Yellow),
                ))
            } else if open {
                Line::from(vec![
                    Span::styled("Enter", Style::default().fg(Color::Red)),
                    Span::raw(" deletes this flow permanently"),
                ])
            } else {
                Line::from(Span::styled(
                    "delete disabled until both checks pass",
                    Style::default().fg(Color::Gray),
                ))
            };
            let lines = vec![
                Line::from(vec![
                    Span::raw("Deleting "),
                    Span::styled(
                        flow.name.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" cannot be undone."),
                ]),
                Line::from(""),
                Line::from(format!(
                    "{} I understand this is permanent (Tab to toggle)",
                    check
                )),
                Line::from(""),
                action_line,
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), parts[0]);

            frame.render_widget(
                Paragraph::new(gate.typed.as_str()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Type \"{}\" to confirm", flow.name)),
                ),
                parts[1],
            );
            frame.set_cursor_position((
                parts[1].x + 1 + cursor_col(&gate.typed),
                parts[1].y + 1,
            ));
        }

        ModalState::Attached { flow, campaigns } => {
            let block = Block::default().borders(Borders::ALL).title(Line::from(vec![
                Span::styled("Flow in use", Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::styled("Esc", Style::default().fg(Color::Gray)),
            ]));
            frame.render_widget(block.clone(), box_area);
            let inner = block.inner(box_area);

            let mut lines = vec![
                Line::from(vec![
                    Span::styled(
                        flow.name.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" cannot be deleted while campaigns reference it:"),
                ]),
                Line::from(""),
            ];
            for (i, c) in campaigns.iter().enumerate() {
                let style = if i == app.modal_selected {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(campaign_line(c), style)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Close, clear the campaigns, then retry the delete  (m monitors selection)",
                Style::default().fg(Color::Gray),
            )));
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        }

        ModalState::Closed => {}
    }
}

/// Cursor column after the typed text. Characters, not bytes; flow names
/// are arbitrary UTF-8.
fn cursor_col(typed: &str) -> u16 {
    typed.chars().count().min(u16::MAX as usize) as u16
}

fn campaign_line(c: &CampaignRef) -> String {
    let mut out = format!("{}  {}  {}", c.id, c.name, c.status);
    if let Some(ts) = &c.created_at {
        out.push_str(&format!("  created {}", fmt_ts_ui(ts)));
    }
    if let Some(by) = &c.created_by {
        out.push_str(&format!(" by {}", by));
    }
    if let Some(ts) = &c.scheduled_at {
        out.push_str(&format!("  scheduled {}", fmt_ts_ui(ts)));
    }
    if let Some(ts) = &c.first_sent_at {
        out.push_str(&format!("  first send {}", fmt_ts_ui(ts)));
    }
    out
}

pub(super) fn handle_modal_key(app: &mut App, key: KeyEvent) {
    match app.controller.modal() {
        ModalState::Confirm { .. } => handle_confirm_key(app, key),
        ModalState::Attached { .. } => handle_attached_key(app, key),
        ModalState::Closed => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.controller.close_modal(),

        // The controller re-checks the gate; if it is closed this is a
        // silent no-op, never a network call.
        KeyCode::Enter => {
            app.controller.confirm_delete();
        }

        KeyCode::Tab => {
            if let Some(gate) = app.controller.gate_mut() {
                gate.toggle();
            }
        }
        KeyCode::Backspace => {
            if let Some(gate) = app.controller.gate_mut() {
                gate.typed.pop();
            }
        }
        KeyCode::Char(c) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT)
                && let Some(gate) = app.controller.gate_mut()
            {
                gate.typed.push(c);
            }
        }
        _ => {}
    }
}

fn handle_attached_key(app: &mut App, key: KeyEvent) {
    let count = match app.controller.modal() {
        ModalState::Attached { campaigns, .. } => campaigns.len(),
        _ => 0,
    };
    match key.code {
        // The only way out of attached mode is an explicit close.
        KeyCode::Esc | KeyCode::Enter => app.controller.close_modal(),

        KeyCode::Up => app.modal_selected = app.modal_selected.saturating_sub(1),
        KeyCode::Down => {
            if app.modal_selected + 1 < count {
                app.modal_selected += 1;
            }
        }

        KeyCode::Char('m') => {
            let campaign = match app.controller.modal() {
                ModalState::Attached { campaigns, .. } => {
                    campaigns.get(app.modal_selected).map(|c| c.id.clone())
                }
                _ => None,
            };
            if let Some(id) = campaign {
                app.controller.close_modal();
                app.open_monitor(id);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::cursor_col;

    #[test]
    fn cursor_counts_characters_not_bytes() {
        assert_eq!(cursor_col(""), 0);
        assert_eq!(cursor_col("Welcome Flow"), 12);
        // Multi-byte input must not push the cursor past the text.
        assert_eq!(cursor_col("Boas-vindas então"), 17);
        assert_eq!(cursor_col("流程"), 2);
    }
}
