//! The closed failure taxonomy routed by the dispatcher.
//!
//! Every failure that reaches [`crate::dispatch`] is a [`Failure`]: either a
//! recognized [`DomainFailure`], or something the application did not plan
//! for (a generic error, a caught panic, or a failure still boxed in a
//! [`FailureCarrier`]).

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt::{self, Write as _};

use thiserror::Error;

use super::carrier::FailureCarrier;

/// Boxed, thread-safe error object used for arbitrary causes.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An expected, user-meaningful failure raised by domain logic.
///
/// Domain failures are shown to the user as a status message. When a nested
/// cause is attached, its message is appended after a single space.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DomainFailure {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl DomainFailure {
    /// Creates a domain failure with no nested cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a domain failure wrapping a lower-level cause.
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// The failure's own message, without the cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The nested cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The text shown to the user: `message`, or `message cause` when a cause
    /// is attached.
    pub fn display_message(&self) -> String {
        match &self.cause {
            None => self.message.clone(),
            Some(cause) => format!("{} {}", self.message, cause),
        }
    }
}

/// Any failure that is not a [`DomainFailure`].
///
/// [`GenericFailure::new`] wraps its argument as-is; use [`Failure::generic`]
/// when the error may be a boxed domain failure.
pub struct GenericFailure(BoxError);

impl GenericFailure {
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self(error.into())
    }

    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }

    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

impl fmt::Debug for GenericFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for GenericFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for GenericFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// A panic caught while running an adapted operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation panicked: {message}")]
pub struct PanicFailure {
    message: String,
}

impl PanicFailure {
    /// Extracts a message from a panic payload as returned by
    /// [`std::panic::catch_unwind`].
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Every failure the dispatcher knows how to route.
#[derive(Debug, Error)]
pub enum Failure {
    /// Expected, user-meaningful failure.
    #[error(transparent)]
    Domain(#[from] DomainFailure),
    /// Unrecognized error.
    #[error(transparent)]
    Generic(#[from] GenericFailure),
    /// A failure boxed while crossing a callback boundary.
    #[error(transparent)]
    Carried(#[from] FailureCarrier),
    /// A panic caught by an adaptation combinator.
    #[error(transparent)]
    Panicked(#[from] PanicFailure),
}

impl Failure {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(DomainFailure::new(message))
    }

    /// Converts an arbitrary error, recognizing domain failures and carriers
    /// hidden behind a `Box<dyn Error>`.
    pub fn generic(error: impl Into<BoxError>) -> Self {
        Self::from(error.into())
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    pub fn is_carried(&self) -> bool {
        matches!(self, Self::Carried(_))
    }

    /// Renders the failure, its full source chain, and the outermost captured
    /// backtrace (if any) for diagnostic logs.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            let _ = write!(out, "\ncaused by: {err}");
            source = err.source();
        }
        if let Some(backtrace) = self.captured_backtrace() {
            let _ = write!(out, "\nbacktrace:\n{backtrace}");
        }
        out
    }

    fn captured_backtrace(&self) -> Option<&Backtrace> {
        match self {
            Self::Carried(carrier) => match carrier.backtrace().status() {
                BacktraceStatus::Captured => Some(carrier.backtrace()),
                _ => carrier.cause().captured_backtrace(),
            },
            _ => None,
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Self::generic(err)
    }
}

impl From<BoxError> for Failure {
    /// Recovers the concrete failure kind from a boxed error, so a
    /// `DomainFailure` returned through `Box<dyn Error>` is still recognized.
    fn from(err: BoxError) -> Self {
        let err = match err.downcast::<Failure>() {
            Ok(failure) => return *failure,
            Err(err) => err,
        };
        let err = match err.downcast::<DomainFailure>() {
            Ok(domain) => return Self::Domain(*domain),
            Err(err) => err,
        };
        let err = match err.downcast::<FailureCarrier>() {
            Ok(carrier) => return Self::Carried(*carrier),
            Err(err) => err,
        };
        let err = match err.downcast::<PanicFailure>() {
            Ok(panic) => return Self::Panicked(*panic),
            Err(err) => err,
        };
        match err.downcast::<GenericFailure>() {
            Ok(generic) => Self::Generic(*generic),
            Err(err) => Self::Generic(GenericFailure(err)),
        }
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::generic(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::generic(message)
    }
}
