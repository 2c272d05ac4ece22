//! Flow lifecycle orchestration: per-tab list cache, publish/delete with
//! per-id busy guards, and the delete-confirmation modal state machine.
//!
//! Reads (list, usage check) run inline; the caller eats the latency the
//! same way the rest of the console does. Mutations run on worker threads
//! and report back over a channel so different flows can be operated on
//! concurrently while the same flow stays serialized behind its busy flag.
//! Cached lists are only ever mutated after server confirmation; there are
//! no optimistic updates for publish or delete.

use std::collections::HashSet;
use std::sync::mpsc;

use crate::model::{CampaignRef, FlowDefinition, FlowId, FlowTab};
use crate::remote::{ApiError, ApiResult, RemoteClient};
use crate::toast::Toasts;

use super::confirm::ConfirmGate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Publish,
    Delete,
}

/// Completion report from a mutation worker.
#[derive(Debug)]
pub struct OpOutcome {
    pub flow_id: FlowId,
    pub kind: OpKind,
    pub result: ApiResult<()>,
}

/// The delete modal. `Attached` has no path to `Confirm`; after clearing
/// blockers the operator must trigger a fresh delete attempt, which re-runs
/// the usage check.
#[derive(Debug)]
pub enum ModalState {
    Closed,
    Confirm {
        flow: FlowDefinition,
        gate: ConfirmGate,
    },
    Attached {
        flow: FlowDefinition,
        campaigns: Vec<CampaignRef>,
    },
}

pub struct LifecycleController {
    client: RemoteClient,
    tab: FlowTab,
    published: Vec<FlowDefinition>,
    draft: Vec<FlowDefinition>,
    busy: HashSet<FlowId>,
    modal: ModalState,
    tx: mpsc::Sender<OpOutcome>,
    rx: mpsc::Receiver<OpOutcome>,
}

impl LifecycleController {
    pub fn new(client: RemoteClient) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            tab: FlowTab::default(),
            published: Vec::new(),
            draft: Vec::new(),
            busy: HashSet::new(),
            modal: ModalState::Closed,
            tx,
            rx,
        }
    }

    pub fn tab(&self) -> FlowTab {
        self.tab
    }

    pub fn flows(&self, tab: FlowTab) -> &[FlowDefinition] {
        match tab {
            FlowTab::Published => &self.published,
            FlowTab::Draft => &self.draft,
        }
    }

    pub fn current(&self) -> &[FlowDefinition] {
        self.flows(self.tab)
    }

    pub fn is_busy(&self, id: &FlowId) -> bool {
        self.busy.contains(id)
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    /// The confirmation gate, editable only while the modal is in confirm
    /// mode.
    pub fn gate_mut(&mut self) -> Option<&mut ConfirmGate> {
        match &mut self.modal {
            ModalState::Confirm { gate, .. } => Some(gate),
            _ => None,
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    /// Switch the active tab. Exactly one list fetch for the new tab.
    pub fn set_tab(&mut self, tab: FlowTab, toasts: &mut Toasts) {
        self.tab = tab;
        self.refresh(toasts);
    }

    /// Re-fetch the current tab's list, replacing the cache. Failure leaves
    /// an empty list and a toast; no retry.
    pub fn refresh(&mut self, toasts: &mut Toasts) {
        let fetched = match self.client.list_flows(self.tab) {
            Ok(flows) => flows,
            Err(err) => {
                toasts.error(format!("list {} flows: {}", self.tab, err));
                Vec::new()
            }
        };
        match self.tab {
            FlowTab::Published => self.published = fetched,
            FlowTab::Draft => self.draft = fetched,
        }
    }

    /// Begin a delete attempt: fetch a fresh usage report and open the modal
    /// in the mode it selects. The destructive call is reachable only
    /// through the modal this opens.
    pub fn request_delete(&mut self, id: &FlowId, toasts: &mut Toasts) {
        if self.busy.contains(id) {
            return;
        }
        let Some(flow) = self.find_flow(id).cloned() else {
            return;
        };
        match self.client.flow_usage(id) {
            Ok(usage) if usage.can_delete => {
                self.modal = ModalState::Confirm {
                    flow,
                    gate: ConfirmGate::default(),
                };
            }
            Ok(usage) => {
                self.modal = ModalState::Attached {
                    flow,
                    campaigns: usage.campaigns,
                };
            }
            Err(err) => {
                // No modal on a failed check.
                toasts.error(format!("check usage for {}: {}", flow.name, err));
            }
        }
    }

    /// Issue the delete call iff the modal is in confirm mode and the gate
    /// is open. Returns whether a call was dispatched.
    pub fn confirm_delete(&mut self) -> bool {
        let ModalState::Confirm { flow, gate } = &self.modal else {
            return false;
        };
        if !gate.is_open(&flow.name) {
            return false;
        }
        let id = flow.id.clone();
        self.dispatch(OpKind::Delete, id)
    }

    /// Publish a draft flow. No-op while the flow is busy or unknown.
    /// Returns whether a call was dispatched.
    pub fn publish(&mut self, id: &FlowId) -> bool {
        if !self.draft.iter().any(|f| &f.id == id) {
            return false;
        }
        self.dispatch(OpKind::Publish, id.clone())
    }

    /// Apply completed mutations. Returns true when any state changed.
    pub fn drain(&mut self, toasts: &mut Toasts) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply_outcome(outcome, toasts);
            changed = true;
        }
        changed
    }

    /// Busy-guarded dispatch: one mutating operation per flow id at a time;
    /// concurrent attempts on the same id are no-ops, not queued.
    fn dispatch(&mut self, kind: OpKind, id: FlowId) -> bool {
        if !self.busy.insert(id.clone()) {
            return false;
        }
        let client = self.client.clone();
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = match kind {
                OpKind::Publish => client.publish_flow(&id),
                OpKind::Delete => client.delete_flow(&id),
            };
            let _ = tx.send(OpOutcome {
                flow_id: id,
                kind,
                result,
            });
        });
        true
    }

    fn apply_outcome(&mut self, outcome: OpOutcome, toasts: &mut Toasts) {
        // The busy flag is released on every exit path below.
        self.busy.remove(&outcome.flow_id);

        match (outcome.kind, outcome.result) {
            (OpKind::Publish, Ok(())) => {
                if let Some(pos) = self.draft.iter().position(|f| f.id == outcome.flow_id) {
                    let mut flow = self.draft.remove(pos);
                    flow.is_published = true;
                    toasts.success(format!("published {}", flow.name));
                    self.published.push(flow);
                } else {
                    toasts.success("flow published");
                }
                self.set_tab(FlowTab::Published, toasts);
            }
            (OpKind::Publish, Err(ApiError::Conflict { message, .. })) => {
                // Business-rule rejection; show the server's words.
                toasts.error(message);
            }
            (OpKind::Publish, Err(ApiError::NotFound)) => {
                toasts.error("flow not found");
            }
            (OpKind::Publish, Err(err)) => {
                toasts.error(format!("publish failed: {}", err));
            }

            (OpKind::Delete, Ok(())) => {
                let name = self
                    .find_flow(&outcome.flow_id)
                    .map(|f| f.name.clone())
                    .unwrap_or_else(|| outcome.flow_id.to_string());
                self.published.retain(|f| f.id != outcome.flow_id);
                self.draft.retain(|f| f.id != outcome.flow_id);
                self.modal = ModalState::Closed;
                toasts.success(format!("deleted {}", name));
                self.refresh(toasts);
            }
            (OpKind::Delete, Err(ApiError::Conflict { campaigns, .. })) => {
                // Usage changed between check and delete. The conflict body
                // is the authoritative report; re-enter attached mode.
                let flow = match std::mem::replace(&mut self.modal, ModalState::Closed) {
                    ModalState::Confirm { flow, .. } | ModalState::Attached { flow, .. } => {
                        Some(flow)
                    }
                    ModalState::Closed => self.find_flow(&outcome.flow_id).cloned(),
                };
                match flow {
                    Some(flow) => {
                        toasts.info(format!("{} is attached to campaigns", flow.name));
                        self.modal = ModalState::Attached { flow, campaigns };
                    }
                    None => toasts.error("delete blocked: flow is attached to campaigns"),
                }
            }
            (OpKind::Delete, Err(ApiError::NotFound)) => {
                toasts.error("flow not found");
                self.modal = ModalState::Closed;
            }
            (OpKind::Delete, Err(err)) => {
                toasts.error(format!("delete failed: {}", err));
                self.modal = ModalState::Closed;
            }
        }
    }

    fn find_flow(&self, id: &FlowId) -> Option<&FlowDefinition> {
        self.published
            .iter()
            .chain(self.draft.iter())
            .find(|f| &f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Offline controller: the address parses but nothing listens, so any
    // inline fetch fails fast with a network error.
    fn controller() -> LifecycleController {
        let client = RemoteClient::new("http://127.0.0.1:9", "t").unwrap();
        LifecycleController::new(client)
    }

    fn flow(id: &str, name: &str, published: bool) -> FlowDefinition {
        FlowDefinition {
            id: FlowId(id.to_string()),
            name: name.to_string(),
            is_published: published,
            created_at: "2026-08-01T00:00:00Z".to_string(),
            updated_at: None,
        }
    }

    fn campaign(id: &str, name: &str, status: &str) -> CampaignRef {
        CampaignRef {
            id: crate::model::CampaignId(id.to_string()),
            name: name.to_string(),
            status: status.to_string(),
            created_at: None,
            created_by: None,
            scheduled_at: None,
            first_sent_at: None,
        }
    }

    #[test]
    fn confirm_delete_requires_open_gate() {
        let mut c = controller();
        c.draft.push(flow("f1", "Welcome Flow", false));
        c.modal = ModalState::Confirm {
            flow: flow("f1", "Welcome Flow", false),
            gate: ConfirmGate::default(),
        };

        // Gate closed: no dispatch, no busy flag.
        assert!(!c.confirm_delete());
        assert!(!c.is_busy(&FlowId("f1".to_string())));

        // Checkbox alone is not enough.
        c.gate_mut().unwrap().toggle();
        assert!(!c.confirm_delete());

        // Both satisfied: the call goes out.
        c.gate_mut().unwrap().typed = "Welcome Flow".to_string();
        assert!(c.confirm_delete());
        assert!(c.is_busy(&FlowId("f1".to_string())));
    }

    #[test]
    fn confirm_delete_unreachable_outside_confirm_mode() {
        let mut c = controller();
        c.draft.push(flow("f1", "Welcome Flow", false));
        assert!(!c.confirm_delete());

        c.modal = ModalState::Attached {
            flow: flow("f1", "Welcome Flow", false),
            campaigns: vec![campaign("c1", "Spring Promo", "Scheduled")],
        };
        assert!(!c.confirm_delete());
    }

    #[test]
    fn busy_guard_serializes_per_id_and_only_per_id() {
        let mut c = controller();
        c.draft.push(flow("f1", "a", false));
        c.draft.push(flow("f2", "b", false));

        let f1 = FlowId("f1".to_string());
        let f2 = FlowId("f2".to_string());

        assert!(c.publish(&f1));
        // Same id while in flight: no-op, not queued.
        assert!(!c.publish(&f1));
        // Different id is unaffected.
        assert!(c.publish(&f2));
        assert!(c.is_busy(&f1) && c.is_busy(&f2));
    }

    #[test]
    fn publish_unknown_or_published_flow_is_noop() {
        let mut c = controller();
        c.published.push(flow("f1", "a", true));
        assert!(!c.publish(&FlowId("f1".to_string())));
        assert!(!c.publish(&FlowId("nope".to_string())));
    }

    #[test]
    fn publish_conflict_shows_server_message_verbatim_and_keeps_flow() {
        let mut c = controller();
        let mut toasts = Toasts::default();
        c.draft.push(flow("f1", "a", false));
        c.busy.insert(FlowId("f1".to_string()));

        c.apply_outcome(
            OpOutcome {
                flow_id: FlowId("f1".to_string()),
                kind: OpKind::Publish,
                result: Err(ApiError::Conflict {
                    message: "Flow has no steps".to_string(),
                    campaigns: Vec::new(),
                }),
            },
            &mut toasts,
        );

        assert_eq!(toasts.latest().unwrap().text, "Flow has no steps");
        assert_eq!(c.draft.len(), 1);
        assert_eq!(c.tab(), FlowTab::Published); // unchanged default, no switch
        assert!(!c.is_busy(&FlowId("f1".to_string())));
    }

    #[test]
    fn publish_success_moves_flow_and_switches_tab() {
        let mut c = controller();
        let mut toasts = Toasts::default();
        c.tab = FlowTab::Draft;
        c.draft.push(flow("f1", "Welcome Flow", false));
        c.busy.insert(FlowId("f1".to_string()));

        c.apply_outcome(
            OpOutcome {
                flow_id: FlowId("f1".to_string()),
                kind: OpKind::Publish,
                result: Ok(()),
            },
            &mut toasts,
        );

        assert!(c.draft.is_empty());
        assert_eq!(c.tab(), FlowTab::Published);
        assert!(
            toasts
                .iter()
                .any(|t| t.text == "published Welcome Flow")
        );
        assert!(!c.is_busy(&FlowId("f1".to_string())));
    }

    #[test]
    fn delete_conflict_reopens_attached_with_payload_campaigns() {
        let mut c = controller();
        let mut toasts = Toasts::default();
        c.draft.push(flow("f1", "Welcome Flow", false));
        c.modal = ModalState::Confirm {
            flow: flow("f1", "Welcome Flow", false),
            gate: ConfirmGate {
                acknowledged: true,
                typed: "Welcome Flow".to_string(),
            },
        };
        c.busy.insert(FlowId("f1".to_string()));

        c.apply_outcome(
            OpOutcome {
                flow_id: FlowId("f1".to_string()),
                kind: OpKind::Delete,
                result: Err(ApiError::Conflict {
                    message: "still attached".to_string(),
                    campaigns: vec![campaign("c1", "Spring Promo", "Scheduled")],
                }),
            },
            &mut toasts,
        );

        match c.modal() {
            ModalState::Attached { flow, campaigns } => {
                assert_eq!(flow.name, "Welcome Flow");
                assert_eq!(campaigns.len(), 1);
                assert_eq!(campaigns[0].name, "Spring Promo");
            }
            other => panic!("expected attached modal, got {:?}", other),
        }
        // The flow itself is untouched.
        assert_eq!(c.draft.len(), 1);
        assert!(!c.is_busy(&FlowId("f1".to_string())));
    }

    #[test]
    fn delete_not_found_closes_modal_with_toast() {
        let mut c = controller();
        let mut toasts = Toasts::default();
        c.modal = ModalState::Confirm {
            flow: flow("f1", "Welcome Flow", false),
            gate: ConfirmGate::default(),
        };
        c.busy.insert(FlowId("f1".to_string()));

        c.apply_outcome(
            OpOutcome {
                flow_id: FlowId("f1".to_string()),
                kind: OpKind::Delete,
                result: Err(ApiError::NotFound),
            },
            &mut toasts,
        );

        assert!(matches!(c.modal(), ModalState::Closed));
        assert_eq!(toasts.latest().unwrap().text, "flow not found");
    }

    #[test]
    fn failed_usage_check_toasts_and_opens_no_modal() {
        let mut c = controller();
        let mut toasts = Toasts::default();
        c.draft.push(flow("f1", "Welcome Flow", false));

        // Nothing listening on the client's port: the check fails.
        c.request_delete(&FlowId("f1".to_string()), &mut toasts);

        assert!(matches!(c.modal(), ModalState::Closed));
        assert_eq!(toasts.latest().unwrap().kind, crate::toast::ToastKind::Error);
    }

    #[test]
    fn request_delete_is_noop_while_busy() {
        let mut c = controller();
        let mut toasts = Toasts::default();
        c.draft.push(flow("f1", "Welcome Flow", false));
        c.busy.insert(FlowId("f1".to_string()));

        c.request_delete(&FlowId("f1".to_string()), &mut toasts);
        assert!(matches!(c.modal(), ModalState::Closed));
        assert!(toasts.is_empty());
    }
}
