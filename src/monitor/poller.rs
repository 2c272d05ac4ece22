//! Recurring snapshot fetches with single-flight supersession.
//!
//! Each outgoing fetch is tagged with a monotonically increasing generation.
//! The poller only ever considers the most recently issued generation
//! current; a response arriving for any other generation is dropped before
//! it can touch displayed state, no matter when it resolves. Workers are
//! never joined or timed out; a hung request is simply superseded by the
//! next tick or by explicit user action.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::model::{CampaignId, ProgressSnapshot};
use crate::remote::{ApiError, ApiResult, RemoteClient};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(4000);

/// What a worker thread sends back: the generation its request was issued
/// under, and the raw fetch result.
#[derive(Debug)]
pub struct PollOutcome {
    pub generation: u64,
    pub result: ApiResult<ProgressSnapshot>,
}

/// An admitted (non-superseded) outcome.
#[derive(Debug)]
pub enum PollEvent {
    Snapshot(ProgressSnapshot),
    /// The fetch failed. The schedule is unaffected; the next tick fires on
    /// time regardless.
    Failed(ApiError),
}

pub struct MetricsPoller {
    client: RemoteClient,
    interval: Duration,
    target: Option<CampaignId>,
    paused: bool,
    generation: u64,
    in_flight: Option<u64>,
    next_due: Option<Instant>,
    tx: mpsc::Sender<PollOutcome>,
    rx: mpsc::Receiver<PollOutcome>,
}

impl MetricsPoller {
    pub fn new(client: RemoteClient, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            interval,
            target: None,
            paused: false,
            generation: 0,
            in_flight: None,
            next_due: None,
            tx,
            rx,
        }
    }

    pub fn target(&self) -> Option<&CampaignId> {
        self.target.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Change (or clear) the monitored campaign. Cancels any in-flight
    /// request and stops the timer; a new target starts with an immediate
    /// fetch unless paused.
    pub fn set_target(&mut self, target: Option<CampaignId>, now: Instant) {
        self.supersede();
        self.next_due = None;
        self.target = target;
        if self.target.is_some() && !self.paused {
            self.fetch_now(now);
        }
    }

    /// Stop the timer and cancel the in-flight request. Last snapshot and
    /// history are untouched; they live in the aggregator.
    pub fn pause(&mut self) {
        self.paused = true;
        self.supersede();
        self.next_due = None;
    }

    /// One immediate fetch, then the interval restarts from this instant.
    pub fn resume(&mut self, now: Instant) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if self.target.is_some() {
            self.fetch_now(now);
        }
    }

    /// Drive the schedule. Returns true when a fetch was started. With no
    /// target, a tick is a no-op.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.paused || self.target.is_none() {
            return false;
        }
        match self.next_due {
            Some(due) if now >= due => {
                self.fetch_now(now);
                true
            }
            Some(_) => false,
            None => {
                self.fetch_now(now);
                true
            }
        }
    }

    /// Admit completed fetches in arrival order, dropping superseded ones.
    pub fn drain(&mut self) -> Vec<PollEvent> {
        let mut events = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(event) = self.admit(outcome) {
                events.push(event);
            }
        }
        events
    }

    fn fetch_now(&mut self, now: Instant) {
        let Some(id) = self.target.clone() else {
            return;
        };
        let generation = self.issue();
        let client = self.client.clone();
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = client.campaign_progress(&id);
            // Receiver gone means the shell shut down; nothing to report to.
            let _ = tx.send(PollOutcome { generation, result });
        });
        self.next_due = Some(now + self.interval);
    }

    /// Issue a new generation, implicitly superseding any outstanding fetch.
    fn issue(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.generation
    }

    fn supersede(&mut self) {
        self.in_flight = None;
    }

    fn admit(&mut self, outcome: PollOutcome) -> Option<PollEvent> {
        if self.in_flight != Some(outcome.generation) {
            // Superseded. Not an error; no user-visible signal.
            return None;
        }
        self.in_flight = None;
        Some(match outcome.result {
            Ok(snap) => PollEvent::Snapshot(snap),
            Err(err) => PollEvent::Failed(err),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poller(interval_ms: u64) -> MetricsPoller {
        // Nothing here opens a connection; the address just has to parse.
        let client = RemoteClient::new("http://127.0.0.1:9", "t").unwrap();
        MetricsPoller::new(client, Duration::from_millis(interval_ms))
    }

    fn ok_snap(tag: &str) -> ApiResult<ProgressSnapshot> {
        Ok(ProgressSnapshot {
            retrieved_at: tag.to_string(),
            total_jobs: 10,
            completed: 1,
            pending: 9,
            in_flight: 0,
            sent: 1,
            failed: 0,
            dead: 0,
            completion_pct: None,
            p50_ms: 0,
            p95_ms: 0,
            p99_ms: 0,
        })
    }

    #[test]
    fn superseded_response_is_dropped_even_if_it_resolves_later() {
        let mut p = poller(1000);
        p.target = Some(CampaignId("c1".to_string()));

        let g1 = p.issue();
        let g2 = p.issue(); // tick fired before g1 resolved

        // g1 resolves late: dropped without touching state.
        assert!(p.admit(PollOutcome { generation: g1, result: ok_snap("old") }).is_none());
        assert!(p.has_in_flight());

        let event = p.admit(PollOutcome { generation: g2, result: ok_snap("new") });
        match event {
            Some(PollEvent::Snapshot(s)) => assert_eq!(s.retrieved_at, "new"),
            other => panic!("expected snapshot, got {:?}", other),
        }
        assert!(!p.has_in_flight());
    }

    #[test]
    fn target_change_cancels_in_flight() {
        let mut p = poller(1000);
        p.target = Some(CampaignId("c1".to_string()));
        let g1 = p.issue();

        p.supersede();
        p.target = Some(CampaignId("c2".to_string()));
        let g2 = p.issue();

        // The old campaign's response arrives after the switch.
        assert!(p.admit(PollOutcome { generation: g1, result: ok_snap("c1") }).is_none());
        assert!(p.admit(PollOutcome { generation: g2, result: ok_snap("c2") }).is_some());
    }

    #[test]
    fn failure_is_admitted_and_schedule_survives() {
        let mut p = poller(1000);
        p.target = Some(CampaignId("c1".to_string()));
        let now = Instant::now();
        p.next_due = Some(now);

        let generation = p.issue();
        let event = p.admit(PollOutcome {
            generation,
            result: Err(ApiError::Server { status: 500, message: "boom".to_string() }),
        });
        assert!(matches!(event, Some(PollEvent::Failed(_))));

        // Next tick still fires on schedule.
        assert!(p.tick(now + Duration::from_millis(1000)));
    }

    #[test]
    fn no_target_means_no_op_ticks() {
        let mut p = poller(10);
        assert!(!p.tick(Instant::now()));
        assert!(!p.has_in_flight());
    }

    #[test]
    fn pause_stops_timer_resume_fetches_immediately() {
        let mut p = poller(60_000);
        let now = Instant::now();
        // set_target spawns a real fetch thread; drive state by hand instead.
        p.target = Some(CampaignId("c1".to_string()));
        let _ = p.issue();
        p.next_due = Some(now + Duration::from_millis(60_000));

        p.pause();
        assert!(!p.has_in_flight());
        assert!(!p.tick(now + Duration::from_secs(120)));

        let resume_at = now + Duration::from_secs(200);
        p.resume(resume_at);
        assert!(p.has_in_flight());
        // Interval re-anchored at the resume fetch.
        assert!(!p.tick(resume_at + Duration::from_secs(59)));
        assert!(p.tick(resume_at + Duration::from_secs(60)));
    }
}
