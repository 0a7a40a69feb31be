//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod pin;
pub mod recognition;
pub mod session;
pub mod timeout;

// Re-export common types
pub use config::AppConfig;
pub use dispatch::{DispatchError, DispatchOutcome, DispatchRequest, Endpoint};
pub use error::*;
pub use pin::Pin;
pub use recognition::{RecognitionErrorKind, RecognitionEvent, RecognizerOptions};
pub use session::{Effect, Session, SessionError, SessionSnapshot, SessionState};
pub use timeout::Timeout;
