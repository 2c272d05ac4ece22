use std::collections::VecDeque;

use crate::model::{HistoryPoint, ProgressSnapshot, resolved_pct};

pub const HISTORY_CAP: usize = 50;

/// Consumes accepted snapshots and keeps the rolling chart history. Raw
/// points only; no smoothing, interpolation, or gap-filling.
#[derive(Debug, Default)]
pub struct ProgressAggregator {
    latest: Option<ProgressSnapshot>,
    history: VecDeque<HistoryPoint>,
}

impl ProgressAggregator {
    /// Record an accepted snapshot. Supersession filtering happens in the
    /// poller; everything handed here is applied.
    pub fn record(&mut self, snap: ProgressSnapshot) {
        self.history.push_back(HistoryPoint::from_snapshot(&snap));
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
        self.latest = Some(snap);
    }

    pub fn latest(&self) -> Option<&ProgressSnapshot> {
        self.latest.as_ref()
    }

    pub fn latest_pct(&self) -> Option<f64> {
        self.latest.as_ref().map(resolved_pct)
    }

    /// Points in retrieval order, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &HistoryPoint> {
        self.history.iter()
    }

    /// A tab switch or target change discards the previous campaign's series.
    pub fn clear(&mut self) {
        self.latest = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(n: u64) -> ProgressSnapshot {
        ProgressSnapshot {
            retrieved_at: format!("t{}", n),
            total_jobs: 100,
            completed: n,
            pending: 100 - n,
            in_flight: 0,
            sent: n,
            failed: 0,
            dead: 0,
            completion_pct: None,
            p50_ms: 0,
            p95_ms: 0,
            p99_ms: 0,
        }
    }

    #[test]
    fn history_is_capped_fifo() {
        let mut agg = ProgressAggregator::default();
        for n in 0..60 {
            agg.record(snap(n));
        }
        assert_eq!(agg.history().len(), HISTORY_CAP);
        // Oldest ten evicted.
        assert_eq!(agg.history().next().unwrap().t, "t10");
        assert_eq!(agg.history().last().unwrap().t, "t59");
        assert_eq!(agg.latest().unwrap().completed, 59);
    }

    #[test]
    fn length_tracks_accepted_count_below_cap() {
        let mut agg = ProgressAggregator::default();
        for n in 0..7 {
            agg.record(snap(n));
        }
        assert_eq!(agg.history().len(), 7);
    }

    #[test]
    fn pct_derived_for_latest() {
        let mut agg = ProgressAggregator::default();
        agg.record(snap(25));
        assert_eq!(agg.latest_pct(), Some(25.0));
    }
}
