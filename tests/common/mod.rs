use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    pub token: String,
    _data_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[allow(dead_code)]
pub fn spawn_server() -> Result<ServerGuard> {
    spawn_server_inner(None)
}

/// Spawn with explicit fixtures; `seed` matches the server's seed-file
/// schema.
#[allow(dead_code)]
pub fn spawn_server_with_seed(seed: &serde_json::Value) -> Result<ServerGuard> {
    spawn_server_inner(Some(seed))
}

fn spawn_server_inner(seed: Option<&serde_json::Value>) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let token = "dev".to_string();
    let addr_file = data_dir.path().join("addr.txt");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_flowdeck-server"));
    cmd.args([
        "--addr",
        "127.0.0.1:0",
        "--addr-file",
        addr_file.to_str().unwrap(),
        "--dev-token",
        &token,
    ]);
    if let Some(seed) = seed {
        let seed_path = data_dir.path().join("seed.json");
        std::fs::write(&seed_path, serde_json::to_vec_pretty(seed)?)
            .context("write seed file")?;
        cmd.args(["--seed-file", seed_path.to_str().unwrap()]);
    }

    let child = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn flowdeck-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        token,
        _data_dir: data_dir,
        child,
    })
}

fn read_addr_file(addr_file: &std::path::Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }
        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => thread::sleep(Duration::from_millis(50)),
        }
    }
}

/// Poll `f` until it returns true or the deadline passes.
#[allow(dead_code)]
pub fn wait_until(deadline: Duration, mut f: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    loop {
        if f() {
            return true;
        }
        if start.elapsed() > deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(20));
    }
}

/// Seed-file fragment for one flow.
#[allow(dead_code)]
pub fn flow_seed(id: &str, name: &str, published: bool, steps: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "published": published,
        "steps": steps,
        "created_at": "2026-08-01T10:00:00Z",
    })
}

/// Seed-file fragment for one campaign attached to `flow_id`.
#[allow(dead_code)]
pub fn campaign_seed(
    id: &str,
    name: &str,
    flow_id: Option<&str>,
    total: u64,
    step: u64,
    delay_ms: Option<u64>,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "status": "Running",
        "flow_id": flow_id,
        "created_at": "2026-08-01T10:00:00Z",
        "created_by": "ops@example.com",
        "scheduled_at": "2026-08-01T12:00:00Z",
        "first_sent_at": "2026-08-01T12:05:00Z",
        "progress": {
            "total": total,
            "completed": 0,
            "failed": 0,
            "dead": 0,
            "in_flight": 0,
            "p50_ms": 100,
            "p95_ms": 500,
            "p99_ms": 900,
            "step": step,
        },
        "wire": "snake",
        "delay_ms": delay_ms,
    })
}

/// Per-route request counters from the dev server.
#[allow(dead_code)]
pub fn route_hits(guard: &ServerGuard, route: &str) -> u64 {
    let client = reqwest::blocking::Client::new();
    let hits: std::collections::HashMap<String, u64> = client
        .get(format!("{}/debug/hits", guard.base_url))
        .header("authorization", format!("Bearer {}", guard.token))
        .send()
        .expect("debug hits request")
        .json()
        .expect("debug hits json");
    hits.get(route).copied().unwrap_or(0)
}
