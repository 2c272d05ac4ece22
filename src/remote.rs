use anyhow::{Context, Result};

mod flows;
mod progress;
mod types;

pub use self::types::{ApiError, ApiResult};

/// Blocking HTTP client for the messaging backend. Cheap to clone; lifecycle
/// mutations and poll fetches each run on their own worker thread with a
/// clone of this client.
#[derive(Clone)]
pub struct RemoteClient {
    base_url: String,
    token: String,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("flowdeck")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.into(),
            token: token.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
