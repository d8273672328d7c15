//! "Add supervisor" form and its validation rules

use andon_protocol::{Shift, Supervisor};
use serde::{Deserialize, Serialize};

use crate::error::{FormErrors, ValidationError};
use crate::phone::is_valid_phone;

/// Longest phone number accepted, before the shape check runs
const MAX_PHONE_LEN: usize = 32;

/// Raw form input, before validation
///
/// Uses the same field names as the remote `/users` records so a client
/// can post what it would send upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorForm {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub genre: String,
    pub level: String,
    pub post: String,
    pub tlp: String,
}

impl Default for SupervisorForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: String::new(),
            genre: String::new(),
            level: String::new(),
            post: Shift::A.as_str().to_string(),
            tlp: String::new(),
        }
    }
}

impl SupervisorForm {
    /// Prefill from an existing record, for editing
    pub fn from_supervisor(supervisor: &Supervisor) -> Self {
        Self {
            name: supervisor.name.clone(),
            kind: supervisor.kind.clone(),
            genre: supervisor.genre.clone(),
            level: supervisor.level.clone(),
            post: supervisor.post.clone(),
            tlp: supervisor.tlp.clone(),
        }
    }

    /// Check every field and build the record to send upstream.
    ///
    /// All failures are collected so they can be shown at once. Values are
    /// trimmed; a blank value counts as missing.
    pub fn validate(&self) -> Result<Supervisor, FormErrors> {
        let mut errors = Vec::new();

        let required = [
            ("Name", "Name", &self.name),
            ("type", "Type", &self.kind),
            ("genre", "Genre", &self.genre),
            ("level", "Level", &self.level),
            ("post", "Post", &self.post),
            ("tlp", "Phone", &self.tlp),
        ];
        for (field, label, value) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::Required { field, label });
            }
        }

        let tlp = self.tlp.trim();
        if !tlp.is_empty() && (tlp.len() > MAX_PHONE_LEN || !is_valid_phone(tlp)) {
            errors.push(ValidationError::InvalidPhone);
        }

        if !errors.is_empty() {
            return Err(FormErrors(errors));
        }

        Ok(Supervisor {
            id: None,
            name: self.name.trim().to_string(),
            kind: self.kind.trim().to_string(),
            genre: self.genre.trim().to_string(),
            level: self.level.trim().to_string(),
            post: self.post.trim().to_string(),
            tlp: tlp.to_string(),
            date: None,
        })
    }
}
