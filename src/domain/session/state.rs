//! Session states and the snapshot published after every transition

use std::fmt;
use thiserror::Error;

use crate::domain::dispatch::DispatchError;
use crate::domain::recognition::RecognitionErrorKind;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// PIN not yet fully entered
    #[default]
    Unauthorized,
    /// Authorized, not recording
    Idle,
    /// Authorized, recognizer running
    Listening,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Idle => "idle",
            Self::Listening => "listening",
        }
    }

    pub const fn recording_state(&self) -> RecordingState {
        match self {
            Self::Listening => RecordingState::Listening,
            Self::Unauthorized | Self::Idle => RecordingState::Idle,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the recognizer is running, as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Listening,
}

/// Last error surfaced to the UI
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Recognition failed: {0}")]
    Recognition(RecognitionErrorKind),

    #[error("Dispatch failed: {0}")]
    Dispatch(DispatchError),
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub recording: RecordingState,
    pub last_text: String,
    pub last_error: Option<SessionError>,
    /// Final results seen so far. Changes exactly when a final result lands.
    pub utterances: u64,
}
