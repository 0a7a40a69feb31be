//! Speech recognition events and error kinds

use std::fmt;

/// Lifecycle event delivered by a speech recognizer.
/// Consumed exactly once by the session, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Recognizer is ready for speech
    Ready,
    /// Intermediate transcription of the current utterance
    PartialResult(String),
    /// Final transcription of the current utterance
    FinalResult(String),
    /// Speaker stopped talking
    EndOfSpeech,
    /// Recognizer reported an error
    Error(RecognitionErrorKind),
}

impl RecognitionEvent {
    /// Short name for logging, never includes recognized text
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::PartialResult(_) => "partial_result",
            Self::FinalResult(_) => "final_result",
            Self::EndOfSpeech => "end_of_speech",
            Self::Error(_) => "error",
        }
    }
}

/// Recognition error taxonomy.
/// None of these are fatal; only `NoMatch` restarts listening automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognitionErrorKind {
    Audio,
    Client,
    InsufficientPermissions,
    Network,
    NetworkTimeout,
    NoMatch,
    RecognizerBusy,
    Server,
    SpeechTimeout,
    Unknown,
}

impl RecognitionErrorKind {
    /// Map the numeric error codes platform recognizers report
    pub const fn from_platform_code(code: i32) -> Self {
        match code {
            1 => Self::NetworkTimeout,
            2 => Self::Network,
            3 => Self::Audio,
            4 => Self::Server,
            5 => Self::Client,
            6 => Self::SpeechTimeout,
            7 => Self::NoMatch,
            8 => Self::RecognizerBusy,
            9 => Self::InsufficientPermissions,
            _ => Self::Unknown,
        }
    }

    /// Human-readable description
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Audio => "Audio recording error",
            Self::Client => "Client side error",
            Self::InsufficientPermissions => "Insufficient permissions",
            Self::Network => "Network error",
            Self::NetworkTimeout => "Network timeout",
            Self::NoMatch => "No speech input detected",
            Self::RecognizerBusy => "Recognition service busy",
            Self::Server => "Server error",
            Self::SpeechTimeout => "No speech input",
            Self::Unknown => "Unknown error",
        }
    }

    /// Whether the session should start listening again on its own
    pub const fn restarts_listening(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Options passed to the recognizer when listening starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizerOptions {
    /// Use the free-form language model rather than web-search phrasing
    pub language_free_form: bool,
    /// Deliver partial results while the user is speaking
    pub partial_results: bool,
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Self {
            language_free_form: true,
            partial_results: true,
        }
    }
}
