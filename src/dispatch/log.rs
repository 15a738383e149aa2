//! Diagnostic log capability injected into [`super::FailureHandler`].

use tracing::error;

/// Receives the one diagnostic record written for an unrecognized failure.
pub trait DiagnosticLog: Send + Sync {
    /// Record `message` at error severity together with the failure's full
    /// `detail` (source chain and backtrace).
    fn error(&self, message: &str, detail: &str);
}

/// Writes diagnostic records as `tracing` events.
///
/// Where the events end up is decided by whichever subscriber the host
/// installed, see [`crate::logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl DiagnosticLog for TracingLog {
    fn error(&self, message: &str, detail: &str) {
        error!(detail = %detail, "{message}");
    }
}

impl<L: DiagnosticLog + ?Sized> DiagnosticLog for &L {
    fn error(&self, message: &str, detail: &str) {
        (**self).error(message, detail)
    }
}

impl<L: DiagnosticLog + ?Sized> DiagnosticLog for std::sync::Arc<L> {
    fn error(&self, message: &str, detail: &str) {
        (**self).error(message, detail)
    }
}
