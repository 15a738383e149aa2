//! Central failure dispatch.
//!
//! [`FailureHandler::handle`] is the single point where a caught failure is
//! resolved. Domain failures become a status message on the
//! [`NotificationSink`]. Anything else is written to the diagnostic log and
//! the sink is told an unknown error occurred. Exactly one sink method is
//! invoked per call.

mod log;
mod result_ext;

pub use log::{DiagnosticLog, TracingLog};
pub use result_ext::ResultExt;

use serde::Deserialize;
use tracing::debug;

use crate::adapt::{adapt_action, adapt_consumer};
use crate::config::DispatchConfig;
use crate::error::Failure;
use crate::notification::NotificationSink;

/// How far the dispatcher looks inside a [`crate::FailureCarrier`] before
/// classifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnwrapPolicy {
    /// Carriers are always unrecognized failures.
    Never,
    /// Classify the carrier's direct cause.
    #[default]
    OneLevel,
    /// Follow nested carriers down to the first non-carrier cause.
    Transitive,
}

/// Classifies failures and routes them to a sink.
#[derive(Debug, Clone, Default)]
pub struct FailureHandler<L = TracingLog> {
    log: L,
    unwrap: UnwrapPolicy,
}

impl FailureHandler<TracingLog> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new().with_unwrap_policy(config.unwrap)
    }
}

impl<L: DiagnosticLog> FailureHandler<L> {
    /// Replaces the diagnostic log.
    pub fn with_log<M: DiagnosticLog>(self, log: M) -> FailureHandler<M> {
        FailureHandler {
            log,
            unwrap: self.unwrap,
        }
    }

    pub fn with_unwrap_policy(mut self, unwrap: UnwrapPolicy) -> Self {
        self.unwrap = unwrap;
        self
    }

    pub fn unwrap_policy(&self) -> UnwrapPolicy {
        self.unwrap
    }

    /// Routes `failure` to exactly one of the sink's two channels.
    pub fn handle<S>(&self, failure: &Failure, sink: &S)
    where
        S: NotificationSink + ?Sized,
    {
        match self.resolve(failure) {
            Failure::Domain(domain) => {
                let message = domain.display_message();
                debug!(status = %message, "domain failure routed to status message");
                sink.show_status_message(&message);
            }
            resolved @ (Failure::Generic(_) | Failure::Carried(_) | Failure::Panicked(_)) => {
                self.log.error(&resolved.to_string(), &failure.detail());
                sink.show_unknown_error_message();
            }
        }
    }

    fn resolve<'f>(&self, failure: &'f Failure) -> &'f Failure {
        match (self.unwrap, failure) {
            (UnwrapPolicy::OneLevel, Failure::Carried(carrier)) => carrier.cause(),
            (UnwrapPolicy::Transitive, _) => {
                let mut current = failure;
                while let Failure::Carried(carrier) = current {
                    current = carrier.cause();
                }
                current
            }
            _ => failure,
        }
    }

    /// Adapts `op` and dispatches any failure it produces, yielding a
    /// callback that cannot fail.
    pub fn guard_consumer<T, E, F, S>(self, op: F, sink: S) -> impl FnMut(T)
    where
        F: FnMut(T) -> Result<(), E>,
        E: Into<Failure>,
        S: NotificationSink,
    {
        let mut adapted = adapt_consumer(op);
        move |value| {
            if let Err(carrier) = adapted(value) {
                self.handle(&Failure::Carried(carrier), &sink);
            }
        }
    }

    /// Zero-argument counterpart of [`FailureHandler::guard_consumer`].
    pub fn guard_action<E, F, S>(self, op: F, sink: S) -> impl FnMut()
    where
        F: FnMut() -> Result<(), E>,
        E: Into<Failure>,
        S: NotificationSink,
    {
        let mut adapted = adapt_action(op);
        move || {
            if let Err(carrier) = adapted() {
                self.handle(&Failure::Carried(carrier), &sink);
            }
        }
    }
}

/// Routes `failure` with the default handler: one-level unwrapping and
/// diagnostics through `tracing`.
pub fn handle<S>(failure: &Failure, sink: &S)
where
    S: NotificationSink + ?Sized,
{
    FailureHandler::new().handle(failure, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, DomainFailure, FailureCarrier};
    use std::io;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        status: Mutex<Vec<String>>,
        unknown: Mutex<usize>,
    }

    impl NotificationSink for RecordingSink {
        fn show_status_message(&self, message: &str) {
            self.status.lock().unwrap().push(message.to_string());
        }

        fn show_unknown_error_message(&self) {
            *self.unknown.lock().unwrap() += 1;
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        records: Mutex<Vec<(String, String)>>,
    }

    impl DiagnosticLog for RecordingLog {
        fn error(&self, message: &str, detail: &str) {
            self.records
                .lock()
                .unwrap()
                .push((message.to_string(), detail.to_string()));
        }
    }

    fn carried_domain(message: &str) -> Failure {
        Failure::Carried(FailureCarrier::new(Failure::domain(message)))
    }

    #[test]
    fn test_domain_failure_routes_to_status() {
        let sink = RecordingSink::default();
        let log = RecordingLog::default();
        let handler = FailureHandler::new().with_log(&log);

        handler.handle(&Failure::domain("M"), &sink);

        assert_eq!(*sink.status.lock().unwrap(), vec!["M".to_string()]);
        assert_eq!(*sink.unknown.lock().unwrap(), 0);
        assert!(log.records.lock().unwrap().is_empty());
    }

    #[test]
    fn test_domain_failure_with_cause_concatenates() {
        let sink = RecordingSink::default();
        let failure = Failure::Domain(DomainFailure::with_cause("M", io::Error::other("C")));

        handle(&failure, &sink);

        assert_eq!(*sink.status.lock().unwrap(), vec!["M C".to_string()]);
    }

    #[test]
    fn test_generic_failure_logs_and_shows_unknown() {
        let sink = RecordingSink::default();
        let log = RecordingLog::default();
        let handler = FailureHandler::new().with_log(&log);

        handler.handle(&Failure::from("X"), &sink);

        assert!(sink.status.lock().unwrap().is_empty());
        assert_eq!(*sink.unknown.lock().unwrap(), 1);
        let records = log.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "X");
        assert!(records[0].1.contains('X'));
    }

    #[test]
    fn test_one_level_unwraps_carried_domain_failure() {
        let sink = RecordingSink::default();
        FailureHandler::new().handle(&carried_domain("Commit failed."), &sink);

        assert_eq!(*sink.status.lock().unwrap(), vec!["Commit failed.".to_string()]);
        assert_eq!(*sink.unknown.lock().unwrap(), 0);
    }

    #[test]
    fn test_one_level_does_not_unwrap_twice() {
        let sink = RecordingSink::default();
        let log = RecordingLog::default();
        let handler = FailureHandler::new().with_log(&log);
        let twice = Failure::Carried(FailureCarrier::new(carried_domain("deep")));

        handler.handle(&twice, &sink);

        assert_eq!(*sink.unknown.lock().unwrap(), 1);
        assert_eq!(log.records.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_transitive_unwraps_nested_carriers() {
        let sink = RecordingSink::default();
        let handler = FailureHandler::new().with_unwrap_policy(UnwrapPolicy::Transitive);
        let twice = Failure::Carried(FailureCarrier::new(carried_domain("deep")));

        handler.handle(&twice, &sink);

        assert_eq!(*sink.status.lock().unwrap(), vec!["deep".to_string()]);
    }

    #[test]
    fn test_never_treats_carrier_as_unknown() {
        let sink = RecordingSink::default();
        let log = RecordingLog::default();
        let handler = FailureHandler::new()
            .with_unwrap_policy(UnwrapPolicy::Never)
            .with_log(&log);

        handler.handle(&carried_domain("hidden"), &sink);

        assert!(sink.status.lock().unwrap().is_empty());
        assert_eq!(*sink.unknown.lock().unwrap(), 1);
        let records = log.records.lock().unwrap();
        assert_eq!(records[0].0, "carried failure: hidden");
    }

    #[test]
    fn test_unknown_detail_keeps_carrier_chain() {
        let sink = RecordingSink::default();
        let log = RecordingLog::default();
        let handler = FailureHandler::new().with_log(&log);
        let carried = Failure::Carried(FailureCarrier::new(io::Error::other("disk full").into()));

        handler.handle(&carried, &sink);

        let records = log.records.lock().unwrap();
        assert_eq!(records[0].0, "disk full");
        assert!(records[0].1.starts_with("carried failure: disk full"));
    }

    fn lookup(query: &str) -> Result<(), BoxError> {
        if query.is_empty() {
            Err(DomainFailure::new("Enter a query first."))?;
        }
        Ok(())
    }

    #[test]
    fn test_domain_failure_behind_box_error_routes_to_status() {
        let sink = RecordingSink::default();
        let log = RecordingLog::default();
        let mut search = adapt_consumer(lookup);

        assert!(search("title:lucene").is_ok());
        let carrier = search("").unwrap_err();
        FailureHandler::new()
            .with_log(&log)
            .handle(&Failure::Carried(carrier), &sink);

        assert_eq!(
            *sink.status.lock().unwrap(),
            vec!["Enter a query first.".to_string()]
        );
        assert_eq!(*sink.unknown.lock().unwrap(), 0);
        assert!(log.records.lock().unwrap().is_empty());
    }

    #[test]
    fn test_guard_consumer_dispatches_failures() {
        let sink = RecordingSink::default();
        let log = RecordingLog::default();
        let mut callback = FailureHandler::new().with_log(&log).guard_consumer(
            |value: u32| {
                if value % 2 == 0 {
                    Err(DomainFailure::new(format!("{value} is even")))
                } else {
                    Ok(())
                }
            },
            &sink,
        );

        callback(1);
        callback(2);

        assert_eq!(*sink.status.lock().unwrap(), vec!["2 is even".to_string()]);
        assert!(log.records.lock().unwrap().is_empty());
    }

    #[test]
    fn test_guard_action_dispatches_panic_as_unknown() {
        let sink = RecordingSink::default();
        let log = RecordingLog::default();
        let mut action = FailureHandler::new()
            .with_log(&log)
            .guard_action(|| -> Result<(), Failure> { panic!("bad state") }, &sink);

        action();

        assert_eq!(*sink.unknown.lock().unwrap(), 1);
        let records = log.records.lock().unwrap();
        assert_eq!(records[0].0, "operation panicked: bad state");
    }

    #[test]
    fn test_from_config_applies_unwrap_policy() {
        let config = DispatchConfig {
            unwrap: UnwrapPolicy::Never,
            ..DispatchConfig::default()
        };
        assert_eq!(
            FailureHandler::from_config(&config).unwrap_policy(),
            UnwrapPolicy::Never
        );
    }
}
