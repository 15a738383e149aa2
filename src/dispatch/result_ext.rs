use super::{DiagnosticLog, FailureHandler};
use crate::error::Failure;
use crate::notification::NotificationSink;

/// Extension trait for resolving a `Result` at a UI or task boundary.
///
/// ```
/// use fault_relay::{ChannelSink, DomainFailure, FailureHandler, Notification, ResultExt};
///
/// let (sink, mut rx) = ChannelSink::channel();
/// let handler = FailureHandler::new();
///
/// let hits: Result<u32, DomainFailure> = Err(DomainFailure::new("Query is empty."));
/// assert_eq!(hits.or_dispatch(&handler, &sink), None);
/// assert_eq!(rx.try_recv().unwrap(), Notification::status("Query is empty."));
/// ```
pub trait ResultExt<T> {
    /// Returns the success value, or dispatches the failure through `handler`
    /// and returns `None`.
    fn or_dispatch<L, S>(self, handler: &FailureHandler<L>, sink: &S) -> Option<T>
    where
        L: DiagnosticLog,
        S: NotificationSink + ?Sized;
}

impl<T, E: Into<Failure>> ResultExt<T> for Result<T, E> {
    fn or_dispatch<L, S>(self, handler: &FailureHandler<L>, sink: &S) -> Option<T>
    where
        L: DiagnosticLog,
        S: NotificationSink + ?Sized,
    {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                handler.handle(&err.into(), sink);
                None
            }
        }
    }
}
