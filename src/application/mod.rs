//! Application layer - Use cases and port interfaces
//!
//! Contains the session driver and the trait definitions
//! for external system interactions.

pub mod ports;
pub mod relay;

// Re-export use case
pub use relay::{
    RelayConfig, RelayError, RelayHandle, RelaySession, SessionClosed, SessionCommand,
};
