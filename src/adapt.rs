//! Combinators that erase an operation's error type into [`FailureCarrier`].
//!
//! Frameworks that accept callbacks usually fix the callback's signature, so
//! an operation failing with `io::Error` cannot be registered next to one
//! failing with `DomainFailure`. The adapted forms all fail with the same
//! carrier type, and the original failure stays reachable through
//! [`FailureCarrier::cause`].
//!
//! Panics raised by the wrapped operation are caught too and carried as
//! [`Failure::Panicked`]. Nothing is swallowed or retried.

use std::panic::{self, AssertUnwindSafe};

use crate::error::{Failure, FailureCarrier, PanicFailure};

/// Adapts a fallible single-argument callback.
///
/// ```
/// use fault_relay::{adapt_consumer, Failure};
///
/// let mut save = adapt_consumer(|id: u32| -> std::io::Result<()> {
///     if id == 0 {
///         return Err(std::io::Error::other("invalid id"));
///     }
///     Ok(())
/// });
///
/// assert!(save(1).is_ok());
/// let carrier = save(0).unwrap_err();
/// assert!(matches!(carrier.cause(), Failure::Generic(_)));
/// ```
pub fn adapt_consumer<T, E, F>(mut op: F) -> impl FnMut(T) -> Result<(), FailureCarrier>
where
    F: FnMut(T) -> Result<(), E>,
    E: Into<Failure>,
{
    move |value| run_boxed(|| op(value))
}

/// Adapts a fallible zero-argument action.
pub fn adapt_action<E, F>(mut op: F) -> impl FnMut() -> Result<(), FailureCarrier>
where
    F: FnMut() -> Result<(), E>,
    E: Into<Failure>,
{
    move || run_boxed(&mut op)
}

fn run_boxed<E, F>(op: F) -> Result<(), FailureCarrier>
where
    F: FnOnce() -> Result<(), E>,
    E: Into<Failure>,
{
    // The operation's state is not observed again after a panic, only the
    // carrier is returned.
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(FailureCarrier::new(err.into())),
        Err(payload) => Err(FailureCarrier::new(
            PanicFailure::from_payload(payload).into(),
        )),
    }
}
