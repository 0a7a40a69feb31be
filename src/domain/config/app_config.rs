//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::dispatch::{Endpoint, DEFAULT_HOST, DEFAULT_PATH, DEFAULT_PORT};
use crate::domain::recognition::RecognizerOptions;
use crate::domain::timeout::Timeout;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
/// The PIN is deliberately not part of it and never touches disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub timeout: Option<String>,
    pub partial_results: Option<bool>,
    pub language_free_form: Option<bool>,
    pub notify: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            path: Some(DEFAULT_PATH.to_string()),
            timeout: Some(Timeout::default().to_string()),
            partial_results: Some(true),
            language_free_form: Some(true),
            notify: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            path: other.path.or(self.path),
            timeout: other.timeout.or(self.timeout),
            partial_results: other.partial_results.or(self.partial_results),
            language_free_form: other.language_free_form.or(self.language_free_form),
            notify: other.notify.or(self.notify),
        }
    }

    /// Endpoint built from host/port/path, falling back per field
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
            self.path.as_deref().unwrap_or(DEFAULT_PATH),
        )
    }

    /// Get timeout as parsed Timeout, or default if not set/invalid
    pub fn timeout_or_default(&self) -> Timeout {
        self.timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Recognizer options, defaulting each flag to on
    pub fn recognizer_options(&self) -> RecognizerOptions {
        RecognizerOptions {
            language_free_form: self.language_free_form.unwrap_or(true),
            partial_results: self.partial_results.unwrap_or(true),
        }
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }
}
