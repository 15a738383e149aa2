//! fault-relay - adapt fallible callbacks and route their failures
//!
//! Callback-driven hosts (UI event loops, listener registries, deferred
//! tasks) accept one fixed callback signature. This crate adapts operations
//! with arbitrary error types into that shape by boxing failures into a
//! [`FailureCarrier`], and provides a single dispatch point that turns any
//! caught [`Failure`] into either a user-facing status message or an
//! unknown-error notification plus a diagnostic log record.
//!
//! ```
//! use fault_relay::{adapt_consumer, ChannelSink, DomainFailure, Failure, FailureHandler, Notification};
//!
//! let (sink, mut rx) = ChannelSink::channel();
//! let handler = FailureHandler::new();
//!
//! let mut on_search = adapt_consumer(|query: &str| {
//!     if query.is_empty() {
//!         return Err(DomainFailure::new("Enter a query first."));
//!     }
//!     Ok(())
//! });
//!
//! if let Err(carrier) = on_search("") {
//!     handler.handle(&Failure::Carried(carrier), &sink);
//! }
//! assert_eq!(rx.try_recv().unwrap(), Notification::status("Enter a query first."));
//! ```

pub mod adapt;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod notification;

pub use adapt::{adapt_action, adapt_consumer};
pub use dispatch::{handle, DiagnosticLog, FailureHandler, ResultExt, TracingLog, UnwrapPolicy};
pub use error::{DomainFailure, Failure, FailureCarrier, GenericFailure, PanicFailure};
pub use notification::{ChannelSink, ConsoleSink, Notification, NotificationSink};
