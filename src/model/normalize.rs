//! Normalization of the backend's aliased record shapes into canonical
//! records. Every endpoint has shipped the same concept under more than one
//! field name over time; each mapping below is a closed alias set tried in
//! priority order. A payload that matches none of the known shapes is
//! rejected with a [`ShapeError`] instead of defaulting to empty values.

use serde_json::Value;
use thiserror::Error;

use super::campaign::{CampaignId, CampaignRef, UsageReport};
use super::flow::{FlowDefinition, FlowId};
use super::progress::ProgressSnapshot;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("unrecognized {record} shape: no {field} field")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("unrecognized {record} shape: bad {field} value")]
    BadField {
        record: &'static str,
        field: &'static str,
    },

    #[error("expected a JSON object for {record}")]
    NotAnObject { record: &'static str },

    #[error("expected a JSON array of {record} records")]
    NotAnArray { record: &'static str },
}

fn str_alias(v: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|k| v.get(*k))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn u64_alias(v: &Value, aliases: &[&str]) -> Option<u64> {
    aliases.iter().find_map(|k| v.get(*k)).and_then(Value::as_u64)
}

fn f64_alias(v: &Value, aliases: &[&str]) -> Option<f64> {
    aliases.iter().find_map(|k| v.get(*k)).and_then(Value::as_f64)
}

fn require_str(
    v: &Value,
    record: &'static str,
    field: &'static str,
    aliases: &[&str],
) -> Result<String, ShapeError> {
    str_alias(v, aliases).ok_or(ShapeError::MissingField { record, field })
}

fn require_u64(
    v: &Value,
    record: &'static str,
    field: &'static str,
    aliases: &[&str],
) -> Result<u64, ShapeError> {
    u64_alias(v, aliases).ok_or(ShapeError::MissingField { record, field })
}

/// Extract a human-readable message from an error body. Known keys only;
/// `None` means the shape is unrecognized and the caller should say so
/// rather than invent a message.
pub fn server_message(v: &Value) -> Option<String> {
    for key in ["message", "error", "detail", "msg"] {
        if let Some(s) = v.get(key).and_then(Value::as_str) {
            return Some(s.to_string());
        }
    }
    None
}

pub fn flow_from_value(v: &Value) -> Result<FlowDefinition, ShapeError> {
    const RECORD: &str = "flow";
    if !v.is_object() {
        return Err(ShapeError::NotAnObject { record: RECORD });
    }

    let id = require_str(v, RECORD, "id", &["id", "flowId", "_id"])?;
    let name = require_str(v, RECORD, "name", &["name", "title"])?;

    // Published state appears as a bool under two names, or as a status
    // string. Any other rendition is an unknown shape.
    let is_published = if let Some(b) = v.get("isPublished").and_then(Value::as_bool) {
        b
    } else if let Some(b) = v.get("published").and_then(Value::as_bool) {
        b
    } else if let Some(s) = v.get("status").and_then(Value::as_str) {
        match s {
            "published" => true,
            "draft" => false,
            _ => {
                return Err(ShapeError::BadField {
                    record: RECORD,
                    field: "status",
                });
            }
        }
    } else {
        return Err(ShapeError::MissingField {
            record: RECORD,
            field: "isPublished",
        });
    };

    let created_at = require_str(v, RECORD, "createdAt", &["createdAt", "created_at"])?;
    let updated_at = str_alias(v, &["updatedAt", "updated_at"]);

    Ok(FlowDefinition {
        id: FlowId(id),
        name,
        is_published,
        created_at,
        updated_at,
    })
}

/// A flow list arrives either as a bare array or wrapped under a known
/// collection key.
pub fn flows_from_value(v: &Value) -> Result<Vec<FlowDefinition>, ShapeError> {
    let arr = if let Some(arr) = v.as_array() {
        arr
    } else {
        ["flows", "items", "data"]
            .iter()
            .find_map(|k| v.get(*k))
            .and_then(Value::as_array)
            .ok_or(ShapeError::NotAnArray { record: "flow" })?
    };
    arr.iter().map(flow_from_value).collect()
}

pub fn campaign_from_value(v: &Value) -> Result<CampaignRef, ShapeError> {
    const RECORD: &str = "campaign";
    if !v.is_object() {
        return Err(ShapeError::NotAnObject { record: RECORD });
    }

    let id = require_str(v, RECORD, "id", &["id", "campaignId", "_id"])?;
    let name = require_str(v, RECORD, "name", &["name", "title"])?;
    let status = require_str(v, RECORD, "status", &["status", "state"])?;

    Ok(CampaignRef {
        id: CampaignId(id),
        name,
        status,
        created_at: str_alias(v, &["createdAt", "created_at"]),
        created_by: str_alias(v, &["createdBy", "created_by"]),
        scheduled_at: str_alias(v, &["scheduledAt", "scheduled_at"]),
        first_sent_at: str_alias(v, &["firstSentAt", "first_sent_at"]),
    })
}

fn campaigns_alias(v: &Value) -> Result<Vec<CampaignRef>, ShapeError> {
    let Some(arr) = ["campaigns", "attachedCampaigns", "usedBy"]
        .iter()
        .find_map(|k| v.get(*k))
        .and_then(Value::as_array)
    else {
        return Ok(Vec::new());
    };
    arr.iter().map(campaign_from_value).collect()
}

pub fn usage_from_value(v: &Value) -> Result<UsageReport, ShapeError> {
    const RECORD: &str = "usage report";
    if !v.is_object() {
        return Err(ShapeError::NotAnObject { record: RECORD });
    }

    let can_delete = ["canDelete", "can_delete", "deletable"]
        .iter()
        .find_map(|k| v.get(*k))
        .and_then(Value::as_bool)
        .ok_or(ShapeError::MissingField {
            record: RECORD,
            field: "canDelete",
        })?;

    Ok(UsageReport {
        can_delete,
        campaigns: campaigns_alias(v)?,
    })
}

/// Campaign list carried in a delete-409 body. Same alias set as the usage
/// report; an absent list is valid (the server refused for another reason).
pub fn campaigns_from_conflict(v: &Value) -> Vec<CampaignRef> {
    campaigns_alias(v).unwrap_or_default()
}

pub fn snapshot_from_value(v: &Value, retrieved_at: String) -> Result<ProgressSnapshot, ShapeError> {
    const RECORD: &str = "progress snapshot";
    if !v.is_object() {
        return Err(ShapeError::NotAnObject { record: RECORD });
    }

    Ok(ProgressSnapshot {
        retrieved_at,
        total_jobs: require_u64(v, RECORD, "totalJobs", &["totalJobs", "total_jobs", "total"])?,
        completed: require_u64(v, RECORD, "completed", &["completed", "done"])?,
        pending: require_u64(v, RECORD, "pending", &["pending", "queued"])?,
        in_flight: require_u64(v, RECORD, "inFlight", &["inFlight", "in_flight"])?,
        sent: require_u64(v, RECORD, "sent", &["sent", "delivered"])?,
        failed: require_u64(v, RECORD, "failed", &["failed"])?,
        dead: require_u64(v, RECORD, "dead", &["dead", "deadLettered", "dead_lettered"])?,
        completion_pct: f64_alias(v, &["completionPct", "completion_pct", "percent"]),
        p50_ms: u64_alias(v, &["p50Ms", "p50_ms", "p50"]).unwrap_or(0),
        p95_ms: u64_alias(v, &["p95Ms", "p95_ms", "p95"]).unwrap_or(0),
        p99_ms: u64_alias(v, &["p99Ms", "p99_ms", "p99"]).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flow_canonical_shape() {
        let f = flow_from_value(&json!({
            "id": "f1",
            "name": "Welcome Flow",
            "isPublished": false,
            "createdAt": "2026-08-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(f.id.as_str(), "f1");
        assert_eq!(f.name, "Welcome Flow");
        assert!(!f.is_published);
    }

    #[test]
    fn flow_aliased_shape() {
        let f = flow_from_value(&json!({
            "flowId": "f2",
            "title": "Abandoned Cart",
            "status": "published",
            "created_at": "2026-08-01T00:00:00Z",
            "updated_at": "2026-08-02T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(f.id.as_str(), "f2");
        assert!(f.is_published);
        assert_eq!(f.updated_at.as_deref(), Some("2026-08-02T00:00:00Z"));
    }

    #[test]
    fn flow_unknown_status_rejected_not_defaulted() {
        let err = flow_from_value(&json!({
            "id": "f3",
            "name": "x",
            "status": "archived",
            "createdAt": "2026-08-01T00:00:00Z",
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ShapeError::BadField {
                record: "flow",
                field: "status"
            }
        );
    }

    #[test]
    fn flow_missing_published_state_rejected() {
        let err = flow_from_value(&json!({
            "id": "f3",
            "name": "x",
            "createdAt": "2026-08-01T00:00:00Z",
        }))
        .unwrap_err();
        assert!(matches!(err, ShapeError::MissingField { .. }));
    }

    #[test]
    fn flow_list_bare_and_wrapped() {
        let item = json!({
            "id": "f1", "name": "a", "published": true,
            "createdAt": "2026-08-01T00:00:00Z",
        });
        assert_eq!(flows_from_value(&json!([item])).unwrap().len(), 1);
        assert_eq!(
            flows_from_value(&json!({ "flows": [item] })).unwrap().len(),
            1
        );
        assert!(flows_from_value(&json!({"count": 0})).is_err());
    }

    #[test]
    fn usage_report_aliases() {
        let u = usage_from_value(&json!({
            "can_delete": false,
            "attachedCampaigns": [
                {"id": "c1", "name": "Spring Promo", "status": "Scheduled"}
            ],
        }))
        .unwrap();
        assert!(!u.can_delete);
        assert_eq!(u.campaigns.len(), 1);
        assert_eq!(u.campaigns[0].name, "Spring Promo");

        // Absent campaign list is a valid shape.
        let u = usage_from_value(&json!({"canDelete": true})).unwrap();
        assert!(u.can_delete);
        assert!(u.campaigns.is_empty());
    }

    #[test]
    fn snapshot_snake_and_camel() {
        let camel = json!({
            "totalJobs": 100, "completed": 40, "pending": 50, "inFlight": 10,
            "sent": 38, "failed": 2, "dead": 0, "completionPct": 40.0,
            "p50Ms": 120, "p95Ms": 800, "p99Ms": 1500,
        });
        let snake = json!({
            "total_jobs": 100, "completed": 40, "pending": 50, "in_flight": 10,
            "sent": 38, "failed": 2, "dead": 0,
        });
        let a = snapshot_from_value(&camel, "t".into()).unwrap();
        let b = snapshot_from_value(&snake, "t".into()).unwrap();
        assert_eq!(a.completion_pct, Some(40.0));
        assert_eq!(a.p95_ms, 800);
        assert_eq!(b.completion_pct, None);
        assert_eq!(b.in_flight, 10);
    }

    #[test]
    fn snapshot_missing_counter_rejected() {
        let err = snapshot_from_value(&json!({"totalJobs": 1}), "t".into()).unwrap_err();
        assert!(matches!(err, ShapeError::MissingField { .. }));
    }

    #[test]
    fn message_closed_alias_set() {
        assert_eq!(
            server_message(&json!({"message": "Flow has no steps"})).as_deref(),
            Some("Flow has no steps")
        );
        assert_eq!(
            server_message(&json!({"detail": "x"})).as_deref(),
            Some("x")
        );
        assert_eq!(server_message(&json!({"reason": "x"})), None);
    }
}
