//! Shareable view state as a URL query string (`tab=draft&campaign=c1`).
//! The active tab is always reflected here so a view can be deep-linked:
//! the shell shows the current string in its header and `flowdeck tui
//! --link ...` restores it.

use anyhow::{Result, bail};

use crate::model::{CampaignId, FlowTab};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkState {
    pub tab: FlowTab,
    pub campaign: Option<CampaignId>,
}

impl LinkState {
    /// Parse a query string, with or without a leading `?`. Unknown keys are
    /// ignored (forward compatibility); a malformed known key is an error.
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.trim().trim_start_matches('?');
        let mut state = LinkState::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "tab" => match FlowTab::parse(value) {
                    Some(tab) => state.tab = tab,
                    None => bail!("unknown tab {:?} (expected published|draft)", value),
                },
                "campaign" => {
                    if value.is_empty() {
                        bail!("campaign requires a value");
                    }
                    state.campaign = Some(CampaignId(value.to_string()));
                }
                _ => {}
            }
        }
        Ok(state)
    }

    pub fn to_query(&self) -> String {
        let mut out = format!("tab={}", self.tab.as_str());
        if let Some(c) = &self.campaign {
            out.push_str("&campaign=");
            out.push_str(c.as_str());
        }
        out
    }
}
