//! Persisted session config: where the backend lives and the bearer token
//! `flowdeck login` stored. JSON under `~/.flowdeck/config.json`, overridable
//! via `FLOWDECK_CONFIG_DIR` (tests point this at a tempdir).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub version: u32,
    pub base_url: String,
    pub token: String,
}

pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("FLOWDECK_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME").context("HOME not set (and no FLOWDECK_CONFIG_DIR)")?;
    Ok(PathBuf::from(home).join(".flowdeck"))
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn load() -> Result<Option<SessionConfig>> {
    let path = config_path()?;
    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    let config: SessionConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(config))
}

pub fn save(config: &SessionConfig) -> Result<()> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join("config.json");
    let bytes = serde_json::to_vec_pretty(config).context("serialize session config")?;
    std::fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Load the stored session or explain how to create one.
pub fn require() -> Result<SessionConfig> {
    load()?.context("not logged in (run `flowdeck login --url ... --token ...`)")
}
