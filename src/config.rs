//! Configuration for dispatch and logging.
//!
//! Loaded from a TOML file with `FAULT_RELAY__<SECTION>__<KEY>` environment
//! overrides, e.g. `FAULT_RELAY__DISPATCH__UNWRAP=never`.
//!
//! ```toml
//! [dispatch]
//! unwrap = "one_level"
//! unknown_error_message = "Something went wrong. See the log."
//!
//! [logging]
//! level = "debug"
//! with_target = false
//! ```

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::dispatch::UnwrapPolicy;
use crate::logging::LoggingConfig;
use crate::notification::DEFAULT_UNKNOWN_ERROR_MESSAGE;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "FAULT_RELAY";

/// Dispatcher settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// How carried failures are unwrapped before classification
    #[serde(default)]
    pub unwrap: UnwrapPolicy,
    /// Text shown for unrecognized failures, by [`crate::ConsoleSink`] and
    /// [`crate::Notification::text`]
    #[serde(default = "default_unknown_error_message")]
    pub unknown_error_message: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            unwrap: UnwrapPolicy::default(),
            unknown_error_message: default_unknown_error_message(),
        }
    }
}

fn default_unknown_error_message() -> String {
    DEFAULT_UNKNOWN_ERROR_MESSAGE.to_string()
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration path is not valid UTF-8.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),

    /// The configuration sources could not be merged or deserialized.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ConfigError),

    /// Inline TOML could not be parsed.
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Load configuration from a TOML file, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8, the file does not
    /// exist, or the merged configuration cannot be deserialized.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound(path.display().to_string()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| ConfigLoadError::InvalidPath(format!("{:?}", path)))?;

        // The file is always TOML, whatever its extension. Environment
        // variables are layered on top and win over file values.
        let file = File::new(path_str, FileFormat::Toml).required(true);
        let overrides = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true);

        let merged = Config::builder()
            .add_source(file)
            .add_source(overrides)
            .build()?;
        Ok(merged.try_deserialize()?)
    }

    /// Parse configuration from a TOML string, without environment overrides.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(toml_str)?)
    }
}
