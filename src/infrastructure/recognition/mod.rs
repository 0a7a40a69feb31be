//! Recognition infrastructure module
//!
//! Speech recognizer adapters. The console adapter turns typed lines into
//! recognition events so the relay runs without a platform speech service.

mod console;

pub use console::{ConsoleRecognizer, SpeechInput};
