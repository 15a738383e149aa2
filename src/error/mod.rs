//! Failure types carried and routed by this crate.
//!
//! [`Failure`] is the closed taxonomy the dispatcher matches on.
//! [`FailureCarrier`] boxes a failure so it can leave an adapted callback
//! through a single, uniform error type.

pub mod carrier;
pub mod failure;

pub use carrier::FailureCarrier;
pub use failure::{BoxError, DomainFailure, Failure, GenericFailure, PanicFailure};
