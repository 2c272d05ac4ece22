use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use super::seed::{CampaignRec, WireStyle, now_ts};

impl AppState {
    async fn hit(&self, key: &str) {
        *self.hits.write().await.entry(key.to_string()).or_insert(0) += 1;
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "not found"})),
    )
        .into_response()
}

fn conflict(body: Value) -> Response {
    (StatusCode::CONFLICT, Json(body)).into_response()
}

async fn hold(delay_ms: Option<u64>) {
    if let Some(ms) = delay_ms {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[derive(Deserialize)]
pub(crate) struct ListQuery {
    tab: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct MutateQuery {
    force: Option<bool>,
    /// Test knob: hold the request open before answering.
    delay_ms: Option<u64>,
}

#[derive(Deserialize)]
pub(crate) struct ProgressQuery {
    delay_ms: Option<u64>,
}

fn flow_json(f: &super::seed::FlowRec) -> Value {
    json!({
        "id": f.id,
        "name": f.name,
        "isPublished": f.published,
        "createdAt": f.created_at,
        "updatedAt": f.updated_at,
    })
}

fn campaign_json(c: &CampaignRec) -> Value {
    json!({
        "id": c.id,
        "name": c.name,
        "status": c.status,
        "createdAt": c.created_at,
        "createdBy": c.created_by,
        "scheduledAt": c.scheduled_at,
        "firstSentAt": c.first_sent_at,
    })
}

pub(crate) async fn list_flows(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    state.hit("GET /flows").await;
    let want_published = match query.tab.as_deref() {
        Some("published") | None => true,
        Some("draft") => false,
        Some(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "unknown tab"})),
            )
                .into_response();
        }
    };
    let flows = state.flows.read().await;
    let out: Vec<Value> = flows
        .iter()
        .filter(|f| f.published == want_published)
        .map(flow_json)
        .collect();
    Json(out).into_response()
}

pub(crate) async fn flow_usage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    state.hit("GET /flows/:id/usage").await;
    if !state.flows.read().await.iter().any(|f| f.id == id) {
        return not_found();
    }
    let campaigns = state.campaigns.read().await;
    let attached: Vec<Value> = campaigns
        .iter()
        .filter(|c| c.flow_id.as_deref() == Some(id.as_str()))
        .map(campaign_json)
        .collect();
    Json(json!({
        "canDelete": attached.is_empty(),
        "campaigns": attached,
    }))
    .into_response()
}

pub(crate) async fn publish_flow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MutateQuery>,
) -> Response {
    state.hit("POST /flows/:id/publish").await;
    hold(query.delay_ms).await;

    let mut flows = state.flows.write().await;
    let Some(flow) = flows.iter_mut().find(|f| f.id == id) else {
        return not_found();
    };
    if flow.steps == 0 {
        return conflict(json!({"message": "Flow has no steps"}));
    }
    flow.published = true;
    flow.updated_at = Some(now_ts());
    Json(json!({})).into_response()
}

pub(crate) async fn delete_flow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MutateQuery>,
) -> Response {
    state.hit("DELETE /flows/:id").await;
    if query.force != Some(true) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "force=true required"})),
        )
            .into_response();
    }
    hold(query.delay_ms).await;

    if !state.flows.read().await.iter().any(|f| f.id == id) {
        return not_found();
    }
    {
        let campaigns = state.campaigns.read().await;
        let attached: Vec<Value> = campaigns
            .iter()
            .filter(|c| c.flow_id.as_deref() == Some(id.as_str()))
            .map(campaign_json)
            .collect();
        if !attached.is_empty() {
            return conflict(json!({
                "message": "flow is attached to campaigns",
                "campaigns": attached,
            }));
        }
    }
    state.flows.write().await.retain(|f| f.id != id);
    StatusCode::NO_CONTENT.into_response()
}

pub(crate) async fn campaign_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ProgressQuery>,
) -> Response {
    state.hit("GET /campaigns/:id/progress").await;

    // Sleep outside the lock so a held campaign does not stall others.
    let seeded_delay = state
        .campaigns
        .read()
        .await
        .iter()
        .find(|c| c.id == id)
        .and_then(|c| c.delay_ms);
    hold(query.delay_ms.or(seeded_delay)).await;

    let mut campaigns = state.campaigns.write().await;
    let Some(c) = campaigns.iter_mut().find(|c| c.id == id) else {
        return not_found();
    };

    // Each poll observes deterministic forward movement.
    let p = &mut c.progress;
    p.completed = (p.completed + p.step).min(p.total);
    if p.completed == p.total {
        p.in_flight = 0;
    }
    let sent = p.completed.saturating_sub(p.failed + p.dead);
    let pending = p.total.saturating_sub(p.completed + p.in_flight);

    let body = match c.wire {
        WireStyle::Snake => json!({
            "total_jobs": p.total,
            "completed": p.completed,
            "pending": pending,
            "in_flight": p.in_flight,
            "sent": sent,
            "failed": p.failed,
            "dead": p.dead,
            "p50_ms": p.p50_ms,
            "p95_ms": p.p95_ms,
            "p99_ms": p.p99_ms,
        }),
        WireStyle::Camel => json!({
            "totalJobs": p.total,
            "completed": p.completed,
            "pending": pending,
            "inFlight": p.in_flight,
            "sent": sent,
            "failed": p.failed,
            "dead": p.dead,
            "completionPct": if p.total == 0 { 0.0 } else {
                p.completed as f64 / p.total as f64 * 100.0
            },
            "p50Ms": p.p50_ms,
            "p95Ms": p.p95_ms,
            "p99Ms": p.p99_ms,
        }),
    };
    Json(body).into_response()
}

pub(crate) async fn debug_hits(State(state): State<AppState>) -> Response {
    Json(state.hits.read().await.clone()).into_response()
}
