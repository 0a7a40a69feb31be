//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! HTTP dispatch, the console recognizer, notifications and config storage.

pub mod config;
pub mod dispatch;
pub mod notification;
pub mod recognition;

// Re-export adapters
pub use config::XdgConfigStore;
pub use dispatch::HttpDispatcher;
pub use notification::{create_notifier, NoOpNotifier, NotifyRustNotifier};
pub use recognition::{ConsoleRecognizer, SpeechInput};
