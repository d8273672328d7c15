//! Session-scoped record of confirmed alert kinds

use andon_protocol::AlertKind;
use std::collections::BTreeSet;
use tracing::info;

/// Alert kinds the operator already confirmed.
///
/// Append-only for the lifetime of a session. Entries are keyed by kind
/// alone, so confirming Quality on one line also silences Quality on every
/// other line until the session is recreated.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationLedger {
    confirmed: BTreeSet<AlertKind>,
}

impl ConfirmationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: AlertKind) -> bool {
        self.confirmed.contains(&kind)
    }

    /// Record a confirmation. Recording the same kind twice is a no-op.
    pub fn record(&mut self, kind: AlertKind) {
        if self.confirmed.insert(kind) {
            info!("Alert kind {} confirmed for this session", kind);
        }
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }

    /// Confirmed kinds in priority order
    pub fn kinds(&self) -> impl Iterator<Item = AlertKind> + '_ {
        self.confirmed.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_contains() {
        let mut ledger = ConfirmationLedger::new();
        assert!(ledger.is_empty());
        assert!(!ledger.contains(AlertKind::Logistics));

        ledger.record(AlertKind::Logistics);
        ledger.record(AlertKind::Logistics);
        assert!(ledger.contains(AlertKind::Logistics));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_kinds_in_priority_order() {
        let mut ledger = ConfirmationLedger::new();
        ledger.record(AlertKind::Maintenance);
        ledger.record(AlertKind::Quality);
        let kinds: Vec<_> = ledger.kinds().collect();
        assert_eq!(kinds, vec![AlertKind::Quality, AlertKind::Maintenance]);
    }
}
