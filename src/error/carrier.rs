//! Type-erasing container for failures crossing a callback boundary.

use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use super::failure::Failure;

/// Holds exactly one [`Failure`] as its cause.
///
/// Carriers are produced by [`crate::adapt`] when an adapted operation fails
/// and are expected to be handed to [`crate::dispatch`] by whatever invoked
/// that operation. A backtrace is captured at construction (subject to
/// `RUST_BACKTRACE`) so the diagnostic log can show where the failure was
/// boxed.
#[derive(Debug)]
pub struct FailureCarrier {
    cause: Box<Failure>,
    backtrace: Backtrace,
}

impl FailureCarrier {
    pub fn new(cause: Failure) -> Self {
        Self {
            cause: Box::new(cause),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn cause(&self) -> &Failure {
        &self.cause
    }

    /// Consumes the carrier and returns the original failure unchanged.
    pub fn into_cause(self) -> Failure {
        *self.cause
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for FailureCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "carried failure: {}", self.cause)
    }
}

impl StdError for FailureCarrier {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.cause)
    }
}
