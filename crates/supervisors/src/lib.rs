//! Supervisor Directory
//!
//! Validation of the "add supervisor" form, name search, and the explicit
//! confirmation step every destructive supervisor action goes through
//! before a request reaches the Andon API.

mod backend;
mod confirm;
mod directory;
mod error;
mod form;
mod phone;

pub use backend::SupervisorBackend;
pub use confirm::{ConfirmGate, PendingAction, PendingId};
pub use directory::{Completed, Directory};
pub use error::{DirectoryError, FormErrors, ValidationError};
pub use form::SupervisorForm;
pub use phone::is_valid_phone;
