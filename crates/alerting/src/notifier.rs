//! Alert Notifier State Machine
//!
//! ```text
//!            scan finds alert
//!   Idle ───────────────────────▶ Alerting
//!    ▲  ▲     condition gone /       │
//!    │  └────── dismiss ─────────────┤
//!    │                               │ confirm
//!    │   condition gone / dismiss    ▼
//!    └─────────────────────── ConfirmedSuppressed
//! ```
//!
//! Only one alert is tracked. While Alerting, further alarms are not
//! queued; they surface on a later scan once the current one is gone.

use andon_protocol::{AlertKind, TelemetryRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ledger::ConfirmationLedger;
use crate::scanner::{AlertScanner, CurrentAlert};
use crate::sink::{NotificationSink, VibrationPattern};

/// Notifier state as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "alert", rename_all = "snake_case")]
pub enum NotifierState {
    #[default]
    Idle,
    /// Modal shown, notification running
    Alerting(CurrentAlert),
    /// Acknowledged; the alarm may still be raised on the line
    ConfirmedSuppressed(CurrentAlert),
}

impl NotifierState {
    pub fn alert(&self) -> Option<&CurrentAlert> {
        match self {
            NotifierState::Idle => None,
            NotifierState::Alerting(a) | NotifierState::ConfirmedSuppressed(a) => Some(a),
        }
    }

    pub fn is_alerting(&self) -> bool {
        matches!(self, NotifierState::Alerting(_))
    }
}

/// What a call changed, for logging and metrics upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Idle/ConfirmedSuppressed → Alerting
    Raised(CurrentAlert),
    /// Alerting → Idle because no line shows the alarm any more
    Cleared(CurrentAlert),
    /// Alerting → ConfirmedSuppressed
    Confirmed(CurrentAlert),
    /// Alerting/ConfirmedSuppressed → Idle by operator request
    Dismissed(CurrentAlert),
    /// ConfirmedSuppressed → Idle because the alarm went away
    Released(CurrentAlert),
}

/// Drives a [`NotificationSink`] from successive snapshots and operator actions
pub struct AlertNotifier<S> {
    sink: S,
    scanner: AlertScanner,
    ledger: ConfirmationLedger,
    state: NotifierState,
    pattern: VibrationPattern,
    /// Whether the sink is currently started
    notifying: bool,
}

impl<S: NotificationSink> AlertNotifier<S> {
    pub fn new(sink: S, pattern: VibrationPattern) -> Self {
        Self {
            sink,
            scanner: AlertScanner::new(),
            ledger: ConfirmationLedger::new(),
            state: NotifierState::Idle,
            pattern,
            notifying: false,
        }
    }

    pub fn state(&self) -> &NotifierState {
        &self.state
    }

    pub fn ledger(&self) -> &ConfirmationLedger {
        &self.ledger
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Re-scan after a new snapshot arrived.
    pub fn observe(&mut self, records: &[TelemetryRecord]) -> Option<Transition> {
        let displayed: Option<AlertKind> = match &self.state {
            NotifierState::Alerting(_) => return None,
            NotifierState::ConfirmedSuppressed(a) => Some(a.kind),
            NotifierState::Idle => None,
        };

        let alert = self.scanner.scan(records, &self.ledger, displayed)?;
        info!("Raising alert: {}", alert);
        self.start_notification();
        self.state = NotifierState::Alerting(alert.clone());
        Some(Transition::Raised(alert))
    }

    /// Continuation tick: keep notifying while the alarm is still raised
    /// somewhere, otherwise drop back to Idle.
    pub fn tick(&mut self, records: &[TelemetryRecord]) -> Option<Transition> {
        match &self.state {
            NotifierState::Idle => None,
            NotifierState::Alerting(alert) => {
                if self.scanner.still_active(records, alert.kind) {
                    debug!("Alert still active: {}", alert);
                    self.sink.repeat(&self.pattern);
                    return None;
                }
                let alert = alert.clone();
                info!("Alert cleared on the line: {}", alert);
                self.stop_notification();
                self.state = NotifierState::Idle;
                Some(Transition::Cleared(alert))
            }
            NotifierState::ConfirmedSuppressed(alert) => {
                if self.scanner.still_active(records, alert.kind) {
                    return None;
                }
                let alert = alert.clone();
                debug!("Confirmed alert released: {}", alert);
                self.state = NotifierState::Idle;
                Some(Transition::Released(alert))
            }
        }
    }

    /// Operator acknowledged the alert. Its kind goes into the ledger and
    /// the notification stops at once.
    pub fn confirm(&mut self) -> Option<Transition> {
        let NotifierState::Alerting(alert) = &self.state else {
            debug!("Confirm ignored: no alert on display");
            return None;
        };
        let alert = alert.clone();
        self.stop_notification();
        self.ledger.record(alert.kind);
        self.state = NotifierState::ConfirmedSuppressed(alert.clone());
        Some(Transition::Confirmed(alert))
    }

    /// Operator waved the alert away without acknowledging it. Nothing is
    /// recorded, so the same kind is raised again on the next scan.
    pub fn dismiss(&mut self) -> Option<Transition> {
        let alert = self.state.alert()?.clone();
        self.stop_notification();
        self.state = NotifierState::Idle;
        info!("Alert dismissed: {}", alert);
        Some(Transition::Dismissed(alert))
    }

    /// Stop any running notification; used when the hosting session ends.
    pub fn shutdown(&mut self) {
        if self.notifying {
            warn!("Shutting down with an active notification");
        }
        self.stop_notification();
        self.state = NotifierState::Idle;
    }

    fn start_notification(&mut self) {
        if !self.notifying {
            self.sink.start(&self.pattern);
            self.notifying = true;
        }
    }

    fn stop_notification(&mut self) {
        if self.notifying {
            self.sink.stop();
            self.notifying = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Effect {
        Start,
        Stop,
        Repeat,
    }

    #[derive(Default)]
    struct RecordingSink {
        effects: Vec<Effect>,
    }

    impl NotificationSink for RecordingSink {
        fn start(&mut self, _pattern: &VibrationPattern) {
            self.effects.push(Effect::Start);
        }
        fn stop(&mut self) {
            self.effects.push(Effect::Stop);
        }
        fn repeat(&mut self, _pattern: &VibrationPattern) {
            self.effects.push(Effect::Repeat);
        }
    }

    fn notifier() -> AlertNotifier<RecordingSink> {
        AlertNotifier::new(RecordingSink::default(), VibrationPattern::default())
    }

    fn line(name: &str) -> TelemetryRecord {
        TelemetryRecord::idle(name, "A")
    }

    fn effects(n: &AlertNotifier<RecordingSink>) -> &[Effect] {
        &n.sink().effects
    }

    #[test]
    fn test_inspection_alert_then_auto_clear() {
        let mut n = notifier();
        let raised = vec![line("L1").with_flag(AlertKind::Inspection, "1")];
        let cleared = vec![line("L1")];

        let t = n.observe(&raised).unwrap();
        assert!(matches!(t, Transition::Raised(ref a) if a.line == "L1" && a.kind == AlertKind::Inspection));
        assert!(n.state().is_alerting());

        assert_eq!(n.observe(&cleared), None);
        let t = n.tick(&cleared).unwrap();
        assert!(matches!(t, Transition::Cleared(_)));
        assert_eq!(n.state(), &NotifierState::Idle);
        assert_eq!(effects(&n), &[Effect::Start, Effect::Stop]);
        assert!(n.ledger().is_empty());
    }

    #[test]
    fn test_tick_repeats_while_active() {
        let mut n = notifier();
        let raised = vec![line("L1").with_flag(AlertKind::Quality, "1")];
        n.observe(&raised);
        assert_eq!(n.tick(&raised), None);
        assert_eq!(n.tick(&raised), None);
        assert_eq!(effects(&n), &[Effect::Start, Effect::Repeat, Effect::Repeat]);
    }

    #[test]
    fn test_second_alert_waits_for_first() {
        let mut n = notifier();
        let both = vec![
            line("L1").with_flag(AlertKind::Quality, "1"),
            line("L2").with_flag(AlertKind::Maintenance, "1"),
        ];
        n.observe(&both);
        assert_eq!(n.state().alert().unwrap().kind, AlertKind::Quality);

        // repeated snapshots do not switch to L2
        assert_eq!(n.observe(&both), None);
        assert_eq!(n.state().alert().unwrap().line, "L1");

        // L1 clears; the tick returns to Idle and the next scan surfaces L2
        let only_l2 = vec![line("L1"), line("L2").with_flag(AlertKind::Maintenance, "1")];
        assert!(matches!(n.tick(&only_l2), Some(Transition::Cleared(_))));
        let t = n.observe(&only_l2).unwrap();
        assert!(matches!(t, Transition::Raised(ref a) if a.line == "L2" && a.kind == AlertKind::Maintenance));
        assert_eq!(effects(&n), &[Effect::Start, Effect::Stop, Effect::Start]);
    }

    #[test]
    fn test_confirm_suppresses_kind_on_every_line() {
        let mut n = notifier();
        n.observe(&[line("L1").with_flag(AlertKind::Quality, "1")]);

        let t = n.confirm().unwrap();
        assert!(matches!(t, Transition::Confirmed(_)));
        assert!(n.ledger().contains(AlertKind::Quality));
        assert!(matches!(n.state(), NotifierState::ConfirmedSuppressed(_)));
        assert_eq!(effects(&n), &[Effect::Start, Effect::Stop]);

        // Quality now on another line: still suppressed
        let other_line = vec![line("L1"), line("L7").with_flag(AlertKind::Quality, "1")];
        assert_eq!(n.observe(&other_line), None);
        assert_eq!(n.tick(&other_line), None);

        // once no line shows Quality the confirmed alert is released
        assert!(matches!(n.tick(&[line("L7")]), Some(Transition::Released(_))));
        assert_eq!(n.state(), &NotifierState::Idle);

        // and Quality still never comes back this session
        assert_eq!(n.observe(&other_line), None);
        assert_eq!(effects(&n), &[Effect::Start, Effect::Stop]);
    }

    #[test]
    fn test_new_kind_raises_after_confirm() {
        let mut n = notifier();
        let snapshot = vec![
            line("L1").with_flag(AlertKind::Quality, "1"),
            line("L2").with_flag(AlertKind::Maintenance, "1"),
        ];
        n.observe(&snapshot);
        n.confirm();

        let t = n.observe(&snapshot).unwrap();
        assert!(matches!(t, Transition::Raised(ref a) if a.kind == AlertKind::Maintenance));
        assert_eq!(effects(&n), &[Effect::Start, Effect::Stop, Effect::Start]);
    }

    #[test]
    fn test_dismiss_allows_retrigger() {
        let mut n = notifier();
        let snapshot = vec![line("L1").with_flag(AlertKind::Logistics, "1")];
        n.observe(&snapshot);

        let t = n.dismiss().unwrap();
        assert!(matches!(t, Transition::Dismissed(_)));
        assert!(n.ledger().is_empty());
        assert_eq!(n.state(), &NotifierState::Idle);

        let t = n.observe(&snapshot).unwrap();
        assert!(matches!(t, Transition::Raised(ref a) if a.kind == AlertKind::Logistics));
        assert_eq!(effects(&n), &[Effect::Start, Effect::Stop, Effect::Start]);
    }

    #[test]
    fn test_actions_without_alert_are_noops() {
        let mut n = notifier();
        assert_eq!(n.confirm(), None);
        assert_eq!(n.dismiss(), None);
        assert_eq!(n.tick(&[line("L1")]), None);
        n.shutdown();
        assert!(effects(&n).is_empty());
    }

    #[test]
    fn test_double_confirm_is_single_stop() {
        let mut n = notifier();
        n.observe(&[line("L1").with_flag(AlertKind::Quality, "1")]);
        assert!(n.confirm().is_some());
        assert_eq!(n.confirm(), None);
        assert_eq!(effects(&n), &[Effect::Start, Effect::Stop]);
    }

    #[test]
    fn test_shutdown_stops_running_notification() {
        let mut n = notifier();
        n.observe(&[line("L1").with_flag(AlertKind::Maintenance, "1")]);
        n.shutdown();
        n.shutdown();
        assert_eq!(n.state(), &NotifierState::Idle);
        assert_eq!(effects(&n), &[Effect::Start, Effect::Stop]);
    }

    #[test]
    fn test_state_serializes_for_ui() {
        let mut n = notifier();
        n.observe(&[line("L1").with_flag(AlertKind::Quality, "1")]);
        let json = serde_json::to_value(n.state()).unwrap();
        assert_eq!(json["state"], "alerting");
        assert_eq!(json["alert"]["line"], "L1");
        assert_eq!(json["alert"]["kind"], "Qualité");

        let idle = serde_json::to_value(NotifierState::Idle).unwrap();
        assert_eq!(idle["state"], "idle");
    }
}
