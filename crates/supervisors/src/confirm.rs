//! Explicit confirmation of supervisor changes
//!
//! Adding, updating and deleting a supervisor is a two-step exchange: the
//! action is staged and the caller gets an id and a prompt back; nothing is
//! sent upstream until that id is confirmed. Cancelling discards the action.

use andon_protocol::Supervisor;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

pub type PendingId = u64;

/// Staged pending actions kept at most; the oldest is dropped beyond this
const MAX_PENDING: usize = 64;

/// A supervisor change awaiting confirmation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PendingAction {
    Create { supervisor: Supervisor },
    Update { id: String, supervisor: Supervisor },
    Delete { id: String },
}

impl PendingAction {
    /// Question shown to the user before the action runs
    pub fn prompt(&self) -> &'static str {
        match self {
            PendingAction::Create { .. } => "Are you sure you want to add this user?",
            PendingAction::Update { .. } => "Are you sure you want to update this user?",
            PendingAction::Delete { .. } => "Are you sure you want to delete this user?",
        }
    }
}

/// Staged actions by id
#[derive(Debug, Default)]
pub struct ConfirmGate {
    next_id: PendingId,
    pending: BTreeMap<PendingId, PendingAction>,
}

impl ConfirmGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an action and return its id
    pub fn stage(&mut self, action: PendingAction) -> PendingId {
        if self.pending.len() >= MAX_PENDING {
            if let Some((dropped, _)) = self.pending.pop_first() {
                debug!(id = dropped, "Dropping oldest unconfirmed action");
            }
        }
        self.next_id += 1;
        let id = self.next_id;
        self.pending.insert(id, action);
        id
    }

    /// Remove a staged action so it can be executed
    pub fn take(&mut self, id: PendingId) -> Option<PendingAction> {
        self.pending.remove(&id)
    }

    /// Discard a staged action; returns whether it existed
    pub fn cancel(&mut self, id: PendingId) -> bool {
        self.pending.remove(&id).is_some()
    }

    pub fn get(&self, id: PendingId) -> Option<&PendingAction> {
        self.pending.get(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete(id: &str) -> PendingAction {
        PendingAction::Delete { id: id.into() }
    }

    #[test]
    fn test_stage_then_take_once() {
        let mut gate = ConfirmGate::new();
        let id = gate.stage(delete("7"));

        assert_eq!(
            gate.get(id).map(PendingAction::prompt),
            Some("Are you sure you want to delete this user?")
        );
        assert_eq!(gate.take(id), Some(delete("7")));
        assert_eq!(gate.take(id), None);
    }

    #[test]
    fn test_cancel() {
        let mut gate = ConfirmGate::new();
        let id = gate.stage(delete("7"));
        assert!(gate.cancel(id));
        assert!(!gate.cancel(id));
        assert!(gate.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut gate = ConfirmGate::new();
        let a = gate.stage(delete("1"));
        gate.cancel(a);
        let b = gate.stage(delete("2"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_oldest_evicted_at_capacity() {
        let mut gate = ConfirmGate::new();
        let first = gate.stage(delete("0"));
        for i in 1..=MAX_PENDING {
            gate.stage(delete(&i.to_string()));
        }
        assert_eq!(gate.len(), MAX_PENDING);
        assert!(gate.get(first).is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(delete("9")).unwrap();
        assert_eq!(json["action"], "delete");
        assert_eq!(json["id"], "9");
    }
}
