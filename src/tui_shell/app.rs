use std::io::{self, IsTerminal};
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::lifecycle::LifecycleController;
use crate::linkstate::LinkState;
use crate::model::CampaignId;
use crate::monitor::{MetricsPoller, ProgressAggregator};
use crate::remote::RemoteClient;
use crate::toast::Toasts;

use super::RunOptions;
use super::event_loop;

pub(super) fn run(client: RemoteClient, opts: RunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut app = App::new(client, opts);
    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Screen {
    Flows,
    Monitor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TimestampMode {
    Relative,
    Absolute,
}

pub(super) struct App {
    pub(super) base_url: String,
    pub(super) controller: LifecycleController,
    pub(super) poller: MetricsPoller,
    pub(super) aggregator: ProgressAggregator,
    pub(super) toasts: Toasts,
    pub(super) link: LinkState,
    pub(super) screen: Screen,
    pub(super) selected: usize,
    /// Row selection inside the attached-mode modal.
    pub(super) modal_selected: usize,
    pub(super) ts_mode: TimestampMode,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn new(client: RemoteClient, opts: RunOptions) -> Self {
        let base_url = client.base_url().to_string();
        let controller = LifecycleController::new(client.clone());
        let poller = MetricsPoller::new(client, opts.poll_interval);

        let mut app = Self {
            base_url,
            controller,
            poller,
            aggregator: ProgressAggregator::default(),
            toasts: Toasts::default(),
            link: opts.link.clone(),
            screen: Screen::Flows,
            selected: 0,
            modal_selected: 0,
            ts_mode: TimestampMode::Relative,
            quit: false,
        };

        app.controller.set_tab(opts.link.tab, &mut app.toasts);
        if let Some(campaign) = opts.link.campaign {
            app.open_monitor(campaign);
        }
        app
    }

    pub(super) fn switch_tab(&mut self) {
        let next = self.controller.tab().other();
        self.controller.set_tab(next, &mut self.toasts);
        self.selected = 0;
        self.sync_link();
    }

    /// Start (or re-enter) the monitor for a campaign. A different campaign
    /// discards the previous series; the same one continues it.
    pub(super) fn open_monitor(&mut self, campaign: CampaignId) {
        if self.poller.target() != Some(&campaign) {
            self.aggregator.clear();
        }
        self.poller.set_target(Some(campaign.clone()), Instant::now());
        self.link.campaign = Some(campaign);
        self.screen = Screen::Monitor;
        self.sync_link();
    }

    /// Navigating away cancels the in-flight fetch and stops the timer; the
    /// last snapshot and history stay for when the operator comes back.
    pub(super) fn leave_monitor(&mut self) {
        self.poller.set_target(None, Instant::now());
        self.screen = Screen::Flows;
    }

    pub(super) fn toggle_pause(&mut self) {
        if self.poller.is_paused() {
            self.poller.resume(Instant::now());
            self.toasts.info("monitor resumed");
        } else {
            self.poller.pause();
            self.toasts.info("monitor paused");
        }
    }

    /// Keep the shareable query string in lockstep with the live state.
    pub(super) fn sync_link(&mut self) {
        self.link.tab = self.controller.tab();
    }

    pub(super) fn selected_flow_id(&self) -> Option<crate::model::FlowId> {
        self.controller
            .current()
            .get(self.selected)
            .map(|f| f.id.clone())
    }

    pub(super) fn clamp_selection(&mut self) {
        let len = self.controller.current().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
