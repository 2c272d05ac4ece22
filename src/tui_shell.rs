use std::time::Duration;

use anyhow::Result;

use crate::linkstate::LinkState;
use crate::remote::RemoteClient;

mod app;
mod event_loop;
mod modal;
mod render;
mod status;
mod views;

#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Restored deep-link state (active tab, monitored campaign).
    pub link: LinkState,
    pub poll_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            link: LinkState::default(),
            poll_interval: crate::monitor::DEFAULT_INTERVAL,
        }
    }
}

pub fn run(client: RemoteClient, opts: RunOptions) -> Result<()> {
    app::run(client, opts)
}
