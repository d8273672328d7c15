//! Remote operations the directory depends on

use andon_protocol::{AndonClient, LineAssignment, Shift, SourceFuture, Supervisor};

/// Supervisor and shift endpoints of the Andon API.
///
/// Implemented by [`AndonClient`]; tests substitute an in-memory backend.
pub trait SupervisorBackend: Send + Sync {
    fn list_supervisors(&self) -> SourceFuture<'_, Vec<Supervisor>>;

    fn create_supervisor<'a>(&'a self, supervisor: &'a Supervisor) -> SourceFuture<'a, Supervisor>;

    fn update_supervisor<'a>(
        &'a self,
        id: &'a str,
        supervisor: &'a Supervisor,
    ) -> SourceFuture<'a, ()>;

    fn delete_supervisor<'a>(&'a self, id: &'a str) -> SourceFuture<'a, ()>;

    fn list_assignments(&self) -> SourceFuture<'_, Vec<LineAssignment>>;

    fn update_post<'a>(&'a self, line: &'a str, shift: Shift) -> SourceFuture<'a, ()>;
}

impl SupervisorBackend for AndonClient {
    fn list_supervisors(&self) -> SourceFuture<'_, Vec<Supervisor>> {
        Box::pin(AndonClient::list_supervisors(self))
    }

    fn create_supervisor<'a>(&'a self, supervisor: &'a Supervisor) -> SourceFuture<'a, Supervisor> {
        Box::pin(AndonClient::create_supervisor(self, supervisor))
    }

    fn update_supervisor<'a>(
        &'a self,
        id: &'a str,
        supervisor: &'a Supervisor,
    ) -> SourceFuture<'a, ()> {
        Box::pin(AndonClient::update_supervisor(self, id, supervisor))
    }

    fn delete_supervisor<'a>(&'a self, id: &'a str) -> SourceFuture<'a, ()> {
        Box::pin(AndonClient::delete_supervisor(self, id))
    }

    fn list_assignments(&self) -> SourceFuture<'_, Vec<LineAssignment>> {
        Box::pin(AndonClient::list_assignments(self))
    }

    fn update_post<'a>(&'a self, line: &'a str, shift: Shift) -> SourceFuture<'a, ()> {
        Box::pin(AndonClient::update_post(self, line, shift))
    }
}
