use serde::{Deserialize, Serialize};

/// Point-in-time read of a campaign's send queue. Immutable once received;
/// `retrieved_at` is stamped client-side when the response is normalized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub retrieved_at: String,

    pub total_jobs: u64,
    pub completed: u64,
    pub pending: u64,
    pub in_flight: u64,
    pub sent: u64,
    pub failed: u64,
    pub dead: u64,

    /// Server-provided percentage when the wire shape carries one; otherwise
    /// derived via [`resolved_pct`] at the point of use.
    #[serde(default)]
    pub completion_pct: Option<f64>,

    #[serde(default)]
    pub p50_ms: u64,
    #[serde(default)]
    pub p95_ms: u64,
    #[serde(default)]
    pub p99_ms: u64,
}

/// Completion percentage for a snapshot: the server's value when present,
/// else `completed / total_jobs * 100`, with an empty queue reading as 0%.
pub fn resolved_pct(snap: &ProgressSnapshot) -> f64 {
    if let Some(pct) = snap.completion_pct {
        return pct;
    }
    if snap.total_jobs == 0 {
        return 0.0;
    }
    snap.completed as f64 / snap.total_jobs as f64 * 100.0
}

/// One chart point derived from an accepted snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub t: String,
    pub pending: u64,
    pub in_flight: u64,
    pub sent: u64,
    pub failed: u64,
    pub dead: u64,
    pub completion_pct: f64,
}

impl HistoryPoint {
    pub fn from_snapshot(snap: &ProgressSnapshot) -> Self {
        Self {
            t: snap.retrieved_at.clone(),
            pending: snap.pending,
            in_flight: snap.in_flight,
            sent: snap.sent,
            failed: snap.failed,
            dead: snap.dead,
            completion_pct: resolved_pct(snap),
        }
    }
}
