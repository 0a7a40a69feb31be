//! VoiceRelay - PIN-gated speech capture relayed to an HTTP endpoint
//!
//! Recognized utterances are posted as `{ "text", "pin" }` JSON to a
//! configurable host. Recording is only possible once a 6-digit PIN has
//! been entered.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session state machine, PIN, recognition events, value objects and errors
//! - **Application**: The relay session driver and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (HTTP dispatch, console recognizer, notifications, config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
