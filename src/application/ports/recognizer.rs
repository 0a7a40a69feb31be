//! Speech recognizer port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::recognition::{RecognitionErrorKind, RecognitionEvent, RecognizerOptions};

/// Channel recognizers push their events into.
/// Unbounded so a platform callback never blocks on the session.
pub type EventSink = mpsc::UnboundedSender<RecognitionEvent>;

/// Receiving end of an [`EventSink`]
pub type EventStream = mpsc::UnboundedReceiver<RecognitionEvent>;

/// Create a connected sink/stream pair
pub fn event_channel() -> (EventSink, EventStream) {
    mpsc::unbounded_channel()
}

/// Recognizer control errors
#[derive(Debug, Clone, Error)]
pub enum RecognizerError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Recognizer is busy")]
    Busy,

    #[error("Failed to start recognizer: {0}")]
    StartFailed(String),

    #[error("Failed to stop recognizer: {0}")]
    StopFailed(String),
}

impl RecognizerError {
    /// Recognition error the session should see for this failure.
    /// Never `NoMatch`, so a failed start cannot trigger a restart loop.
    pub const fn kind(&self) -> RecognitionErrorKind {
        match self {
            Self::PermissionDenied => RecognitionErrorKind::InsufficientPermissions,
            Self::Busy => RecognitionErrorKind::RecognizerBusy,
            Self::StartFailed(_) | Self::StopFailed(_) => RecognitionErrorKind::Client,
        }
    }
}

/// Port for a platform speech recognizer.
///
/// Results arrive asynchronously through the [`EventSink`] the adapter was
/// built with, never through these methods.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Begin listening for one utterance
    async fn start(&self, options: RecognizerOptions) -> Result<(), RecognizerError>;

    /// Stop listening. Pending results may still be delivered.
    async fn stop(&self) -> Result<(), RecognizerError>;

    /// Release the recognizer. No events follow.
    async fn destroy(&self);

    /// Whether microphone access was granted
    fn permission_granted(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_never_restart() {
        let errors = [
            RecognizerError::PermissionDenied,
            RecognizerError::Busy,
            RecognizerError::StartFailed("x".to_string()),
            RecognizerError::StopFailed("x".to_string()),
        ];
        for err in errors {
            assert!(!err.kind().restarts_listening(), "{:?}", err);
        }
    }

    #[test]
    fn permission_maps_to_insufficient_permissions() {
        assert_eq!(
            RecognizerError::PermissionDenied.kind(),
            RecognitionErrorKind::InsufficientPermissions
        );
    }
}
