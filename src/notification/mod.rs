//! Notification sinks: the two presentation channels failures are routed to.
//!
//! The dispatcher only needs something implementing [`NotificationSink`].
//! Two reference sinks are provided: [`ChannelSink`] forwards
//! [`Notification`] values to a UI task, and [`ConsoleSink`] writes styled
//! lines to a terminal.

mod console;

pub use console::ConsoleSink;

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use crate::config::DispatchConfig;

/// Default text for the unknown-error channel.
pub const DEFAULT_UNKNOWN_ERROR_MESSAGE: &str =
    "An unknown error occurred. Check the log for details.";

/// Receiver of dispatched failures.
///
/// Both methods must not fail. Implementations that need a particular
/// thread (for example a UI event loop) are responsible for marshaling.
pub trait NotificationSink {
    /// Show a user-facing status message for a recognized failure.
    fn show_status_message(&self, message: &str);

    /// Signal that an unrecognized failure occurred.
    fn show_unknown_error_message(&self);
}

impl<S: NotificationSink + ?Sized> NotificationSink for &S {
    fn show_status_message(&self, message: &str) {
        (**self).show_status_message(message)
    }

    fn show_unknown_error_message(&self) {
        (**self).show_unknown_error_message()
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn show_status_message(&self, message: &str) {
        (**self).show_status_message(message)
    }

    fn show_unknown_error_message(&self) {
        (**self).show_unknown_error_message()
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    fn show_status_message(&self, message: &str) {
        (**self).show_status_message(message)
    }

    fn show_unknown_error_message(&self) {
        (**self).show_unknown_error_message()
    }
}

/// A dispatched notification, as delivered by [`ChannelSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// Status message for a recognized failure.
    Status(String),
    /// An unrecognized failure occurred; details are in the log.
    UnknownError,
}

impl Notification {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status(message.into())
    }

    pub fn is_unknown_error(&self) -> bool {
        matches!(self, Self::UnknownError)
    }

    /// The text to present, using the configured unknown-error message.
    ///
    /// A UI task draining a [`ChannelSink`] should render through this rather
    /// than `Display`, which always uses [`DEFAULT_UNKNOWN_ERROR_MESSAGE`].
    pub fn text<'a>(&'a self, config: &'a DispatchConfig) -> &'a str {
        match self {
            Self::Status(message) => message,
            Self::UnknownError => &config.unknown_error_message,
        }
    }
}

/// Renders status text as-is and [`Notification::UnknownError`] as
/// [`DEFAULT_UNKNOWN_ERROR_MESSAGE`].
impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(message) => write!(f, "{}", message),
            Self::UnknownError => write!(f, "{}", DEFAULT_UNKNOWN_ERROR_MESSAGE),
        }
    }
}

/// Forwards notifications over an unbounded channel.
///
/// Sending never blocks, so the sink is safe to call from any thread. If the
/// receiving side has been dropped the notification is discarded with a
/// warning.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with the receiver the UI task drains.
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn forward(&self, notification: Notification) {
        if let Err(err) = self.tx.send(notification) {
            warn!(notification = %err.0, "notification receiver closed, dropping notification");
        }
    }
}

impl NotificationSink for ChannelSink {
    fn show_status_message(&self, message: &str) {
        self.forward(Notification::status(message));
    }

    fn show_unknown_error_message(&self) {
        self.forward(Notification::UnknownError);
    }
}
