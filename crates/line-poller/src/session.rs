//! Polling Session Implementation
//!
//! One tokio task owns the snapshot, the notifier and its ledger. It
//! `select!`s over the three timers, operator commands and fetch results,
//! and every branch runs to completion before the next, so none of that
//! state needs a lock.
//!
//! Fetches are fire-and-forget: each tick spawns a request that reports
//! back on a channel. A slow response may overlap the next tick. Once the
//! session stops the channel's receiver is gone and late responses are
//! dropped instead of applied.

use alerting::{AlertConfig, AlertNotifier, CurrentAlert, NotificationSink, Transition};
use andon_protocol::{ApiError, DashboardSource, TelemetryRecord};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{PollerConfig, MIN_INTERVAL};
use crate::error::SessionError;
use crate::view::{DashboardView, Feed, PollError};

/// Capacity of the operator command channel
const COMMAND_CAPACITY: usize = 16;

/// Capacity of the fetch result channel
const OUTCOME_CAPACITY: usize = 32;

enum Command {
    Confirm(oneshot::Sender<Option<CurrentAlert>>),
    Dismiss(oneshot::Sender<Option<CurrentAlert>>),
    Stop(oneshot::Sender<()>),
}

enum Outcome {
    Telemetry(Result<Vec<TelemetryRecord>, ApiError>),
    Balance(Result<f64, ApiError>),
}

/// Handle to a running dashboard session.
///
/// Dropping the handle also ends the session.
pub struct PollingSession {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<DashboardView>,
}

impl PollingSession {
    /// Spawn the session task. Must be called inside a tokio runtime.
    ///
    /// Both polls and the continuation check fire once immediately, then on
    /// their own intervals.
    pub fn start<N>(
        source: Arc<dyn DashboardSource>,
        sink: N,
        poller: &PollerConfig,
        alerting: &AlertConfig,
    ) -> Self
    where
        N: NotificationSink + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CAPACITY);
        let (view_tx, view_rx) = watch::channel(DashboardView::starting());

        let worker = SessionWorker {
            source,
            notifier: AlertNotifier::new(sink, alerting.pattern()),
            view: DashboardView::starting(),
            view_tx,
            outcome_tx,
        };
        let timers = Timers {
            telemetry: ticker(poller.telemetry_interval()),
            balance: ticker(poller.balance_interval()),
            continuation: ticker(alerting.continuation_interval()),
        };

        info!(
            "Starting polling session (telemetry every {:?}, balance every {:?})",
            poller.telemetry_interval(),
            poller.balance_interval()
        );
        tokio::spawn(worker.run(timers, command_rx, outcome_rx));

        Self {
            commands: command_tx,
            view: view_rx,
        }
    }

    /// Current dashboard state
    pub fn view(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view.clone()
    }

    pub fn is_running(&self) -> bool {
        self.view.borrow().running
    }

    /// Confirm the alert on display. Returns the confirmed alert, or `None`
    /// if nothing was alerting.
    pub async fn confirm(&self) -> Result<Option<CurrentAlert>, SessionError> {
        self.request(Command::Confirm).await
    }

    /// Dismiss the alert on display without recording a confirmation.
    pub async fn dismiss(&self) -> Result<Option<CurrentAlert>, SessionError> {
        self.request(Command::Dismiss).await
    }

    /// Cancel all timers and any running notification. Waits until the
    /// session task has finished; a no-op if it already has.
    pub async fn stop(&self) {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Stop(tx)).await.is_ok() {
            let _ = rx.await;
        }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| SessionError::NotRunning)?;
        rx.await.map_err(|_| SessionError::NotRunning)
    }
}

struct Timers {
    telemetry: Interval,
    balance: Interval,
    continuation: Interval,
}

fn ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period.max(MIN_INTERVAL));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

struct SessionWorker<N> {
    source: Arc<dyn DashboardSource>,
    notifier: AlertNotifier<N>,
    view: DashboardView,
    view_tx: watch::Sender<DashboardView>,
    outcome_tx: mpsc::Sender<Outcome>,
}

impl<N: NotificationSink> SessionWorker<N> {
    async fn run(
        mut self,
        mut timers: Timers,
        mut commands: mpsc::Receiver<Command>,
        mut outcomes: mpsc::Receiver<Outcome>,
    ) {
        let stop_reply = loop {
            tokio::select! {
                _ = timers.telemetry.tick() => self.spawn_poll(Feed::Telemetry),
                _ = timers.balance.tick() => self.spawn_poll(Feed::Balance),
                _ = timers.continuation.tick() => self.continuation_tick(),
                Some(outcome) = outcomes.recv() => self.apply(outcome),
                command = commands.recv() => match command {
                    Some(Command::Confirm(reply)) => {
                        let _ = reply.send(self.confirm());
                    }
                    Some(Command::Dismiss(reply)) => {
                        let _ = reply.send(self.dismiss());
                    }
                    Some(Command::Stop(reply)) => break Some(reply),
                    None => break None,
                },
            }
        };

        self.notifier.shutdown();
        self.view.running = false;
        self.publish();
        info!("Polling session stopped");

        if let Some(reply) = stop_reply {
            let _ = reply.send(());
        }
    }

    fn spawn_poll(&self, feed: Feed) {
        debug!("Polling {}", feed.as_str());
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = match feed {
                Feed::Telemetry => Outcome::Telemetry(source.latest_data().await),
                Feed::Balance => Outcome::Balance(source.balance().await),
            };
            if tx.send(outcome).await.is_err() {
                debug!("Discarding {} response for a stopped session", feed.as_str());
            }
        });
    }

    fn apply(&mut self, outcome: Outcome) {
        self.view.loading = false;
        match outcome {
            Outcome::Telemetry(Ok(records)) => {
                count_poll(Feed::Telemetry, "ok");
                debug!("Telemetry snapshot with {} lines", records.len());
                self.view.records = records;
                self.view.telemetry_updated_at = Some(Utc::now());
                self.view.telemetry_error = None;
                if let Some(transition) = self.notifier.observe(&self.view.records) {
                    count_transition(&transition);
                }
            }
            Outcome::Telemetry(Err(err)) => {
                self.view.telemetry_error = Some(poll_failed(Feed::Telemetry, &err));
            }
            Outcome::Balance(Ok(balance)) => {
                count_poll(Feed::Balance, "ok");
                self.view.balance = Some(balance);
                self.view.balance_updated_at = Some(Utc::now());
                self.view.balance_error = None;
            }
            Outcome::Balance(Err(err)) => {
                self.view.balance_error = Some(poll_failed(Feed::Balance, &err));
            }
        }
        self.publish();
    }

    fn continuation_tick(&mut self) {
        if let Some(transition) = self.notifier.tick(&self.view.records) {
            count_transition(&transition);
            self.publish();
        }
    }

    fn confirm(&mut self) -> Option<CurrentAlert> {
        let transition = self.notifier.confirm()?;
        count_transition(&transition);
        self.publish();
        match transition {
            Transition::Confirmed(alert) => Some(alert),
            _ => None,
        }
    }

    fn dismiss(&mut self) -> Option<CurrentAlert> {
        let transition = self.notifier.dismiss()?;
        count_transition(&transition);
        self.publish();
        match transition {
            Transition::Dismissed(alert) => Some(alert),
            _ => None,
        }
    }

    fn publish(&mut self) {
        self.view.alert = self.notifier.state().clone();
        self.view.confirmed = self.notifier.ledger().kinds().collect();
        self.view_tx.send_replace(self.view.clone());
    }
}

fn poll_failed(feed: Feed, err: &ApiError) -> PollError {
    let outcome = if err.is_server_error() {
        "server_error"
    } else {
        "transport_error"
    };
    count_poll(feed, outcome);
    warn!("{} poll failed, keeping previous data: {}", feed.as_str(), err);
    PollError::new(feed, err)
}

fn count_poll(feed: Feed, outcome: &'static str) {
    metrics::counter!("andon_polls_total", "feed" => feed.as_str(), "outcome" => outcome).increment(1);
}

fn count_transition(transition: &Transition) {
    match transition {
        Transition::Raised(alert) => {
            metrics::counter!("andon_alerts_raised_total", "kind" => alert.kind.as_str()).increment(1);
        }
        Transition::Confirmed(alert) => {
            metrics::counter!("andon_alerts_confirmed_total", "kind" => alert.kind.as_str())
                .increment(1);
        }
        Transition::Cleared(_) | Transition::Dismissed(_) | Transition::Released(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::{NotifierState, VibrationPattern};
    use andon_protocol::{AlertKind, SourceFuture};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::sleep;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Effect {
        Start,
        Stop,
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<Effect>>>);

    impl SharedSink {
        fn effects(&self) -> Vec<Effect> {
            self.0.lock().unwrap().clone()
        }
    }

    impl NotificationSink for SharedSink {
        fn start(&mut self, _pattern: &VibrationPattern) {
            self.0.lock().unwrap().push(Effect::Start);
        }
        fn stop(&mut self) {
            self.0.lock().unwrap().push(Effect::Stop);
        }
    }

    /// Replays telemetry results in order, repeating the last one
    struct ScriptedSource {
        telemetry: Vec<Result<Vec<TelemetryRecord>, ApiError>>,
        balance: Result<f64, ApiError>,
        delay: Duration,
        telemetry_calls: AtomicUsize,
        balance_calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(telemetry: Vec<Result<Vec<TelemetryRecord>, ApiError>>) -> Self {
            Self {
                telemetry,
                balance: Ok(612.0),
                delay: Duration::ZERO,
                telemetry_calls: AtomicUsize::new(0),
                balance_calls: AtomicUsize::new(0),
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl DashboardSource for ScriptedSource {
        fn latest_data(&self) -> SourceFuture<'_, Vec<TelemetryRecord>> {
            let n = self.telemetry_calls.fetch_add(1, Ordering::SeqCst);
            let result = self.telemetry[n.min(self.telemetry.len() - 1)].clone();
            let delay = self.delay;
            Box::pin(async move {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                result
            })
        }

        fn balance(&self) -> SourceFuture<'_, f64> {
            self.balance_calls.fetch_add(1, Ordering::SeqCst);
            let result = self.balance.clone();
            Box::pin(async move { result })
        }
    }

    fn line(name: &str) -> TelemetryRecord {
        TelemetryRecord::idle(name, "A")
    }

    fn start(source: Arc<ScriptedSource>, sink: SharedSink) -> PollingSession {
        PollingSession::start(
            source,
            sink,
            &PollerConfig::default(),
            &AlertConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_raised_then_auto_cleared() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(vec![line("L1").with_flag(AlertKind::Inspection, "1")]),
            Ok(vec![line("L1")]),
        ]));
        let sink = SharedSink::default();
        let session = start(source, sink.clone());

        sleep(Duration::from_millis(10)).await;
        let view = session.view();
        let alert = view.alert.alert().expect("alert raised");
        assert!(view.alert.is_alerting());
        assert_eq!((alert.line.as_str(), alert.kind), ("L1", AlertKind::Inspection));
        assert_eq!(sink.effects(), vec![Effect::Start]);

        // second snapshot lands at 2s; the continuation check clears by 4s
        sleep(Duration::from_millis(4100)).await;
        assert_eq!(session.view().alert, NotifierState::Idle);
        assert_eq!(sink.effects(), vec![Effect::Start, Effect::Stop]);
        assert!(session.view().confirmed.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_first_alert_surfaces() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![
            line("L1").with_flag(AlertKind::Quality, "1"),
            line("L2").with_flag(AlertKind::Maintenance, "1"),
        ])]));
        let sink = SharedSink::default();
        let session = start(source, sink.clone());

        sleep(Duration::from_millis(6100)).await;
        let view = session.view();
        let alert = view.alert.alert().unwrap();
        assert_eq!((alert.line.as_str(), alert.kind), ("L1", AlertKind::Quality));
        assert_eq!(sink.effects(), vec![Effect::Start]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_suppresses_kind() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![
            line("L1").with_flag(AlertKind::Quality, "1"),
            line("L2").with_flag(AlertKind::Quality, "1"),
        ])]));
        let sink = SharedSink::default();
        let session = start(source, sink.clone());

        sleep(Duration::from_millis(10)).await;
        let confirmed = session.confirm().await.unwrap().unwrap();
        assert_eq!(confirmed.kind, AlertKind::Quality);

        sleep(Duration::from_millis(6000)).await;
        let view = session.view();
        assert!(matches!(view.alert, NotifierState::ConfirmedSuppressed(_)));
        assert_eq!(view.confirmed, vec![AlertKind::Quality]);
        assert_eq!(sink.effects(), vec![Effect::Start, Effect::Stop]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_retriggers_on_next_snapshot() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![
            line("L1").with_flag(AlertKind::Logistics, "1"),
        ])]));
        let sink = SharedSink::default();
        let session = start(source, sink.clone());

        sleep(Duration::from_millis(10)).await;
        assert!(session.dismiss().await.unwrap().is_some());
        assert_eq!(session.view().alert, NotifierState::Idle);

        sleep(Duration::from_millis(2100)).await;
        assert!(session.view().alert.is_alerting());
        assert_eq!(sink.effects(), vec![Effect::Start, Effect::Stop, Effect::Start]);
        assert!(session.view().confirmed.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_keeps_snapshot() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(vec![line("L1"), line("L2")]),
            Err(ApiError::Transport("connection refused".into())),
        ]));
        let session = start(source, SharedSink::default());

        sleep(Duration::from_millis(2100)).await;
        let view = session.view();
        assert_eq!(view.records.len(), 2);
        assert!(!view.loading);
        let err = view.telemetry_error.expect("error surfaced");
        assert_eq!(err.feed, Feed::Telemetry);
        assert!(!err.server_error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_json_flagged_as_server_error() {
        let source = Arc::new(ScriptedSource::new(vec![Err(ApiError::UnexpectedContentType {
            content_type: "text/html".into(),
            body: "<html>".into(),
        })]));
        let session = start(source, SharedSink::default());

        sleep(Duration::from_millis(10)).await;
        let view = session.view();
        assert!(view.records.is_empty());
        assert!(view.telemetry_error.unwrap().server_error);
        assert_eq!(view.balance, Some(612.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_timers() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![line("L1")])]));
        let session = start(Arc::clone(&source), SharedSink::default());

        sleep(Duration::from_millis(10_100)).await;
        // fired at 0, 2, 4, 6, 8, 10 s and 0, 5, 10 s
        assert_eq!(source.telemetry_calls.load(Ordering::SeqCst), 6);
        assert_eq!(source.balance_calls.load(Ordering::SeqCst), 3);
        session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timers_and_notification() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![
            line("L1").with_flag(AlertKind::Maintenance, "1"),
        ])]));
        let sink = SharedSink::default();
        let session = start(Arc::clone(&source), sink.clone());

        sleep(Duration::from_millis(10)).await;
        session.stop().await;
        assert!(!session.is_running());
        assert_eq!(session.view().alert, NotifierState::Idle);
        assert_eq!(sink.effects(), vec![Effect::Start, Effect::Stop]);

        let calls = source.telemetry_calls.load(Ordering::SeqCst);
        sleep(Duration::from_secs(10)).await;
        assert_eq!(source.telemetry_calls.load(Ordering::SeqCst), calls);
        assert_eq!(session.confirm().await, Err(SessionError::NotRunning));

        // stopping twice is harmless
        session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_not_applied_after_stop() {
        let source = Arc::new(
            ScriptedSource::new(vec![Ok(vec![line("L1").with_flag(AlertKind::Quality, "1")])])
                .delayed(Duration::from_secs(3)),
        );
        let sink = SharedSink::default();
        let session = start(source, sink.clone());

        sleep(Duration::from_millis(100)).await;
        session.stop().await;

        sleep(Duration::from_secs(5)).await;
        assert!(session.view().records.is_empty());
        assert!(sink.effects().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_ends_session() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![
            line("L1").with_flag(AlertKind::Quality, "1"),
        ])]));
        let sink = SharedSink::default();
        let session = start(source, sink.clone());
        let mut view = session.subscribe();

        sleep(Duration::from_millis(10)).await;
        drop(session);

        while view.borrow_and_update().running {
            if view.changed().await.is_err() {
                break;
            }
        }
        assert_eq!(sink.effects(), vec![Effect::Start, Effect::Stop]);
    }
}
