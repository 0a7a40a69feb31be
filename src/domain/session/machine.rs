//! Capture-and-dispatch session state machine

use crate::domain::dispatch::{DispatchOutcome, DispatchRequest};
use crate::domain::error::PinError;
use crate::domain::pin::Pin;
use crate::domain::recognition::{RecognitionErrorKind, RecognitionEvent};

use super::state::{
    InvalidStateTransition, RecordingState, SessionError, SessionSnapshot, SessionState,
};

/// Side effect requested by a transition.
/// The driver performs them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRecognizer,
    StopRecognizer,
    Dispatch(DispatchRequest),
}

/// Session entity.
/// Performs no I/O: every transition returns the effects to carry out.
///
/// State machine:
///   UNAUTHORIZED -> IDLE (enter_pin reaches 6 digits)
///   IDLE -> LISTENING (start)
///   LISTENING -> IDLE (stop, EndOfSpeech, FinalResult, Error)
///   LISTENING -> IDLE -> LISTENING (Error(NoMatch))
#[derive(Debug, Default)]
pub struct Session {
    pin: Pin,
    state: SessionState,
    last_text: String,
    last_error: Option<SessionError>,
    utterances: u64,
    // Set by start, cleared by an explicit stop. Gates the NoMatch restart.
    keep_listening: bool,
}

impl Session {
    /// Create a new session awaiting its PIN
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn recording_state(&self) -> RecordingState {
        self.state.recording_state()
    }

    pub fn is_authorized(&self) -> bool {
        self.state != SessionState::Unauthorized
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    pub fn pin(&self) -> &Pin {
        &self.pin
    }

    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// Number of final results accepted so far
    pub fn utterances(&self) -> u64 {
        self.utterances
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            recording: self.recording_state(),
            last_text: self.last_text.clone(),
            last_error: self.last_error.clone(),
            utterances: self.utterances,
        }
    }

    /// Replace the PIN field contents.
    /// Reaching the full length moves UNAUTHORIZED -> IDLE.
    pub fn enter_pin(&mut self, input: &str) -> Result<(), PinError> {
        if self.is_authorized() {
            return Err(PinError::AlreadyAuthorized);
        }
        self.pin.replace(input)?;
        if self.pin.is_authorized() {
            self.state = SessionState::Idle;
        }
        Ok(())
    }

    /// Transition from IDLE to LISTENING
    pub fn start(&mut self) -> Result<Vec<Effect>, InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "start listening".to_string(),
            });
        }
        self.last_error = None;
        Ok(self.begin_listening())
    }

    /// Transition from LISTENING to IDLE. Idempotent.
    pub fn stop(&mut self) -> Vec<Effect> {
        if self.is_authorized() {
            self.keep_listening = false;
        }
        self.end_listening()
    }

    /// Apply a recognizer event
    pub fn handle_event(&mut self, event: RecognitionEvent) -> Vec<Effect> {
        if !self.is_authorized() {
            return Vec::new();
        }

        match event {
            RecognitionEvent::Ready => Vec::new(),
            RecognitionEvent::PartialResult(text) => {
                self.last_text = text;
                Vec::new()
            }
            RecognitionEvent::EndOfSpeech => self.end_listening(),
            RecognitionEvent::FinalResult(text) => {
                let request = DispatchRequest::new(text.as_str(), &self.pin);
                self.last_text = text;
                self.utterances += 1;
                let mut effects = vec![Effect::Dispatch(request)];
                effects.extend(self.end_listening());
                effects
            }
            RecognitionEvent::Error(kind) => {
                self.last_error = Some(SessionError::Recognition(kind));
                let mut effects = self.end_listening();
                if kind.restarts_listening() && self.keep_listening {
                    effects.extend(self.begin_listening());
                }
                effects
            }
        }
    }

    /// The recognizer refused to start: back to IDLE without a stop,
    /// since nothing is running.
    pub fn start_failed(&mut self, kind: RecognitionErrorKind) {
        if self.state == SessionState::Listening {
            self.state = SessionState::Idle;
        }
        self.keep_listening = false;
        self.last_error = Some(SessionError::Recognition(kind));
    }

    /// Record the outcome of a finished dispatch.
    /// Only touches the last error.
    pub fn record_dispatch(&mut self, outcome: &DispatchOutcome) {
        if let DispatchOutcome::Failed(e) = outcome {
            self.last_error = Some(SessionError::Dispatch(e.clone()));
        }
    }

    fn begin_listening(&mut self) -> Vec<Effect> {
        self.last_text.clear();
        self.state = SessionState::Listening;
        self.keep_listening = true;
        vec![Effect::StartRecognizer]
    }

    fn end_listening(&mut self) -> Vec<Effect> {
        if self.state != SessionState::Listening {
            return Vec::new();
        }
        self.state = SessionState::Idle;
        vec![Effect::StopRecognizer]
    }
}
