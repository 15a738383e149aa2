//! Terminal sink rendering notifications as single styled lines.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;
use tracing::warn;

use super::{NotificationSink, DEFAULT_UNKNOWN_ERROR_MESSAGE};
use crate::config::DispatchConfig;

/// Writes status and unknown-error lines to a terminal (stderr by default).
pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
    unknown_error_message: String,
}

impl ConsoleSink {
    /// Creates a sink writing to stderr with colors enabled.
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color: true,
            unknown_error_message: DEFAULT_UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }

    /// Creates a stderr sink using the configured unknown-error text.
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::stderr().with_unknown_error_message(config.unknown_error_message.clone())
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn with_unknown_error_message(mut self, message: impl Into<String>) -> Self {
        self.unknown_error_message = message.into();
        self
    }

    fn render_status(&self, message: &str) -> String {
        if self.color {
            format!("{} {}", "status:".cyan().bold(), message)
        } else {
            format!("status: {}", message)
        }
    }

    fn render_unknown_error(&self) -> String {
        if self.color {
            format!(
                "{} {}",
                "error:".red().bold(),
                self.unknown_error_message.red()
            )
        } else {
            format!("error: {}", self.unknown_error_message)
        }
    }

    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            warn!(error = %err, "failed to write notification to console");
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("color", &self.color)
            .field("unknown_error_message", &self.unknown_error_message)
            .finish_non_exhaustive()
    }
}

impl NotificationSink for ConsoleSink {
    fn show_status_message(&self, message: &str) {
        self.write_line(&self.render_status(message));
    }

    fn show_unknown_error_message(&self) {
        self.write_line(&self.render_unknown_error());
    }
}
