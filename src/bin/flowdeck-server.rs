//! Development/test backend for the flowdeck console: the five wire
//! contracts (flow list, usage, publish, delete, campaign progress) with
//! in-memory state. Integration tests spawn this binary; it is not the
//! production backend.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use clap::Parser;
use tokio::sync::RwLock;

#[path = "flowdeck_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "flowdeck_server/seed.rs"]
mod seed;
use self::seed::*;

#[derive(Parser)]
#[command(name = "flowdeck-server")]
#[command(about = "In-memory dev backend for flowdeck", long_about = None)]
struct Args {
    /// Listen address; port 0 picks a free port
    #[arg(long, default_value = "127.0.0.1:0")]
    addr: SocketAddr,

    /// Write the bound address here once listening (test handshake)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Bearer token accepted on every authenticated route
    #[arg(long, default_value = "dev")]
    dev_token: String,

    /// JSON seed replacing the built-in fixtures
    #[arg(long)]
    seed_file: Option<PathBuf>,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) token: String,
    pub(crate) flows: Arc<RwLock<Vec<FlowRec>>>,
    pub(crate) campaigns: Arc<RwLock<Vec<CampaignRec>>>,
    pub(crate) hits: Arc<RwLock<HashMap<String, u64>>>,
}

async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let ok = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", state.token));
    if !ok {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "unauthorized"})),
        )
            .into_response();
    }
    next.run(req).await
}

fn router(state: AppState) -> Router {
    let authed = Router::new()
        .route("/flows", get(list_flows))
        .route("/flows/:id/usage", get(flow_usage))
        .route("/flows/:id/publish", post(publish_flow))
        .route("/flows/:id", delete(delete_flow))
        .route("/campaigns/:id/progress", get(campaign_progress))
        .route("/debug/hits", get(debug_hits))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .merge(authed)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let seed = match &args.seed_file {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read seed file {}", path.display()))?;
            serde_json::from_slice(&bytes).context("parse seed file")?
        }
        None => Seed::default_fixtures(),
    };

    let state = AppState {
        token: args.dev_token,
        flows: Arc::new(RwLock::new(seed.flows)),
        campaigns: Arc::new(RwLock::new(seed.campaigns)),
        hits: Arc::new(RwLock::new(HashMap::new())),
    };

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    let local = listener.local_addr().context("local addr")?;

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local.to_string())
            .with_context(|| format!("write {}", addr_file.display()))?;
    }
    eprintln!("flowdeck-server listening on {}", local);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .context("serve")?;
    Ok(())
}
