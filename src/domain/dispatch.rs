//! Dispatch value objects: the request sent per utterance, its outcome,
//! and the endpoint it is sent to.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::pin::Pin;

/// Default endpoint host (a device on the local network)
pub const DEFAULT_HOST: &str = "192.168.1.1";

/// Default endpoint port
pub const DEFAULT_PORT: u16 = 8000;

/// Default endpoint path
pub const DEFAULT_PATH: &str = "/type";

/// Payload for one finalized utterance.
///
/// The PIN travels in plain text next to the recognized text. The receiver
/// is expected to compare it, nothing here protects it in transit.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRequest {
    text: String,
    pin: String,
}

impl DispatchRequest {
    /// Build a request, snapshotting the PIN as it is right now
    pub fn new(text: impl Into<String>, pin: &Pin) -> Self {
        Self {
            text: text.into(),
            pin: pin.as_str().to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }
}

// The PIN stays out of logs
impl fmt::Debug for DispatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRequest")
            .field("chars", &self.text.chars().count())
            .field("pin", &"<redacted>")
            .finish()
    }
}

/// Why a dispatch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Endpoint responded with HTTP {0}")]
    Status(u16),
}

/// Result of a single dispatch attempt. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ok,
    Failed(DispatchError),
}

impl DispatchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<Result<(), DispatchError>> for DispatchOutcome {
    fn from(result: Result<(), DispatchError>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(e) => Self::Failed(e),
        }
    }
}

/// Address of the receiving server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    path: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        Self {
            host: host.into(),
            port,
            path,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full request URL
    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PATH)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(digits: &str) -> Pin {
        let mut pin = Pin::new();
        pin.replace(digits).unwrap();
        pin
    }

    #[test]
    fn request_serializes_text_and_pin() {
        let request = DispatchRequest::new("turn on the light", &pin("048275"));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "turn on the light", "pin": "048275" })
        );
    }

    #[test]
    fn request_escapes_quotes_in_text() {
        let request = DispatchRequest::new(r#"say "hi""#, &pin("048275"));
        let body = serde_json::to_string(&request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["text"], r#"say "hi""#);
    }

    #[test]
    fn request_keeps_pin_snapshot() {
        let mut live = pin("048275");
        let request = DispatchRequest::new("hello", &live);
        live.replace("").unwrap();
        assert_eq!(request.pin(), "048275");
    }

    #[test]
    fn debug_output_hides_pin() {
        let request = DispatchRequest::new("open", &pin("048275"));
        let debug = format!("{:?}", request);
        assert!(!debug.contains("048275"));
        assert!(debug.contains("<redacted>"));

        let effect = format!("{:?}", crate::domain::session::Effect::Dispatch(request));
        assert!(!effect.contains("048275"));
    }

    #[test]
    fn outcome_from_result() {
        assert_eq!(DispatchOutcome::from(Ok(())), DispatchOutcome::Ok);
        assert_eq!(
            DispatchOutcome::from(Err(DispatchError::Status(500))),
            DispatchOutcome::Failed(DispatchError::Status(500))
        );
    }

    #[test]
    fn default_endpoint_url() {
        assert_eq!(Endpoint::default().url(), "http://192.168.1.1:8000/type");
    }

    #[test]
    fn endpoint_adds_leading_slash() {
        let endpoint = Endpoint::new("localhost", 9000, "keys");
        assert_eq!(endpoint.path(), "/keys");
        assert_eq!(endpoint.to_string(), "http://localhost:9000/keys");
    }

    #[test]
    fn status_error_message() {
        assert_eq!(
            DispatchError::Status(503).to_string(),
            "Endpoint responded with HTTP 503"
        );
    }
}
