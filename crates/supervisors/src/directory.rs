//! Supervisor directory over the remote API

use andon_protocol::{filter_by_name, LineAssignment, Shift, Supervisor};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use crate::backend::SupervisorBackend;
use crate::confirm::{ConfirmGate, PendingAction, PendingId};
use crate::error::DirectoryError;
use crate::form::SupervisorForm;

/// Result of a confirmed action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Completed {
    Created { supervisor: Supervisor },
    Updated { id: String },
    Deleted { id: String },
}

/// Supervisor listing, search and confirmed changes
pub struct Directory {
    backend: Arc<dyn SupervisorBackend>,
    gate: Mutex<ConfirmGate>,
}

impl Directory {
    pub fn new(backend: Arc<dyn SupervisorBackend>) -> Self {
        Self {
            backend,
            gate: Mutex::new(ConfirmGate::new()),
        }
    }

    fn gate(&self) -> MutexGuard<'_, ConfirmGate> {
        self.gate.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Supervisors whose name contains `search`, case-insensitively
    pub async fn supervisors(&self, search: &str) -> Result<Vec<Supervisor>, DirectoryError> {
        let all = self.backend.list_supervisors().await?;
        Ok(filter_by_name(&all, search).into_iter().cloned().collect())
    }

    /// Validate a new supervisor and stage its creation
    pub fn stage_create(&self, form: &SupervisorForm) -> Result<PendingId, DirectoryError> {
        let supervisor = form.validate()?;
        Ok(self.gate().stage(PendingAction::Create { supervisor }))
    }

    /// Validate edited fields and stage the update of `id`
    pub fn stage_update(&self, id: &str, form: &SupervisorForm) -> Result<PendingId, DirectoryError> {
        let supervisor = form.validate()?;
        Ok(self.gate().stage(PendingAction::Update {
            id: id.to_string(),
            supervisor,
        }))
    }

    pub fn stage_delete(&self, id: &str) -> PendingId {
        self.gate().stage(PendingAction::Delete { id: id.to_string() })
    }

    /// Staged action, for showing its prompt
    pub fn pending(&self, pending: PendingId) -> Option<PendingAction> {
        self.gate().get(pending).cloned()
    }

    /// Run a staged action against the API.
    ///
    /// The action is consumed even when the request fails; the caller
    /// stages it again to retry.
    pub async fn confirm(&self, pending: PendingId) -> Result<Completed, DirectoryError> {
        let action = self
            .gate()
            .take(pending)
            .ok_or(DirectoryError::UnknownPending(pending))?;

        let completed = match action {
            PendingAction::Create { supervisor } => {
                let created = self.backend.create_supervisor(&supervisor).await?;
                Completed::Created { supervisor: created }
            }
            PendingAction::Update { id, supervisor } => {
                self.backend.update_supervisor(&id, &supervisor).await?;
                Completed::Updated { id }
            }
            PendingAction::Delete { id } => {
                self.backend.delete_supervisor(&id).await?;
                Completed::Deleted { id }
            }
        };
        info!(pending, outcome = ?completed, "Supervisor change applied");
        Ok(completed)
    }

    /// Drop a staged action without contacting the API
    pub fn cancel(&self, pending: PendingId) -> Result<(), DirectoryError> {
        if self.gate().cancel(pending) {
            Ok(())
        } else {
            Err(DirectoryError::UnknownPending(pending))
        }
    }

    /// Line to shift assignments whose line name contains `search`
    pub async fn assignments(&self, search: &str) -> Result<Vec<LineAssignment>, DirectoryError> {
        let all = self.backend.list_assignments().await?;
        Ok(filter_by_name(&all, search).into_iter().cloned().collect())
    }

    /// Move a line to another shift; applied immediately
    pub async fn change_shift(&self, line: &str, shift: Shift) -> Result<(), DirectoryError> {
        self.backend.update_post(line, shift).await?;
        info!(line, %shift, "Line shift changed");
        Ok(())
    }
}
