//! Directory Error Types

use andon_protocol::ApiError;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::confirm::PendingId;

/// A single invalid form field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field left empty
    #[error("{label} is required")]
    Required {
        field: &'static str,
        label: &'static str,
    },

    /// Phone present but not shaped like a phone number
    #[error("Phone number is not valid")]
    InvalidPhone,
}

impl ValidationError {
    /// Wire name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field, .. } => field,
            ValidationError::InvalidPhone => "tlp",
        }
    }
}

/// Every invalid field of a form, reported together
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormErrors(pub Vec<ValidationError>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field name → message, for rendering next to each input
    pub fn by_field(&self) -> BTreeMap<&'static str, String> {
        self.0.iter().map(|e| (e.field(), e.to_string())).collect()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for FormErrors {}

/// Errors from [`Directory`](crate::Directory) operations
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("Invalid supervisor: {0}")]
    Invalid(#[from] FormErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// Already confirmed, cancelled, or never staged
    #[error("No pending action with id {0}")]
    UnknownPending(PendingId),
}
