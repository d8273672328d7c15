//! Route handlers

use serde::Deserialize;

pub mod alerts;
pub mod lines;
pub mod supervisors;

/// `?search=` filter shared by the list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}
