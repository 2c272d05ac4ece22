use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::lifecycle::ModalState;
use crate::monitor::PollEvent;

use super::app::{App, Screen, TimestampMode};
use super::{modal, render};

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        let now = Instant::now();
        app.poller.tick(now);
        for ev in app.poller.drain() {
            match ev {
                PollEvent::Snapshot(snap) => app.aggregator.record(snap),
                // The schedule is untouched; the next tick fires regardless.
                PollEvent::Failed(err) => app.toasts.error(format!("poll: {}", err)),
            }
        }
        if app.controller.drain(&mut app.toasts) {
            app.sync_link();
            app.clamp_selection();
        }

        terminal
            .draw(|f| render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if !matches!(app.controller.modal(), ModalState::Closed) {
        modal::handle_modal_key(app, key);
        return;
    }

    match app.screen {
        Screen::Flows => handle_flows_key(app, key),
        Screen::Monitor => handle_monitor_key(app, key),
    }
}

fn handle_flows_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc => app.quit = true,

        KeyCode::Tab => app.switch_tab(),

        KeyCode::Up => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Down => {
            let len = app.controller.current().len();
            if app.selected + 1 < len {
                app.selected += 1;
            }
        }

        KeyCode::Char('r') => {
            app.controller.refresh(&mut app.toasts);
            app.clamp_selection();
        }

        KeyCode::Char('p') => {
            let Some(id) = app.selected_flow_id() else {
                return;
            };
            if app.controller.is_busy(&id) {
                return;
            }
            if !app.controller.publish(&id) {
                app.toasts.info("publish applies to draft flows");
            }
        }

        KeyCode::Char('d') => {
            let Some(id) = app.selected_flow_id() else {
                return;
            };
            if app.controller.is_busy(&id) {
                return;
            }
            app.modal_selected = 0;
            app.controller.request_delete(&id, &mut app.toasts);
        }

        KeyCode::Char('m') => match app.link.campaign.clone() {
            Some(campaign) => app.open_monitor(campaign),
            None => app.toasts.info("no campaign selected to monitor"),
        },

        KeyCode::Char('t') => {
            app.ts_mode = match app.ts_mode {
                TimestampMode::Relative => TimestampMode::Absolute,
                TimestampMode::Absolute => TimestampMode::Relative,
            };
        }

        _ => {}
    }
}

fn handle_monitor_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc => app.leave_monitor(),
        KeyCode::Char(' ') => app.toggle_pause(),
        _ => {}
    }
}
