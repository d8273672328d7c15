//! Name search shared by every list on the dashboard

use crate::record::TelemetryRecord;
use crate::supervisor::{LineAssignment, Supervisor};

/// Anything that can be searched by name
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for TelemetryRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Supervisor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for LineAssignment {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Case-insensitive substring filter. A blank term keeps everything.
pub fn filter_by_name<'a, T: Named>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&term))
        .collect()
}
