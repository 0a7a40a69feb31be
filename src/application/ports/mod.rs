//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod dispatcher;
pub mod notifier;
pub mod recognizer;

// Re-export common types
pub use config::ConfigStore;
pub use dispatcher::Dispatcher;
pub use notifier::{NotificationError, NotificationLevel, Notifier};
pub use recognizer::{
    event_channel, EventSink, EventStream, RecognizerError, SpeechRecognizer,
};
