//! Console recognizer adapter
//!
//! Stands in for a platform speech service on a terminal: each line handed
//! to [`SpeechInput::speak`] is treated as one spoken utterance and turned
//! into the same event sequence a real recognizer produces.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{EventSink, RecognizerError, SpeechRecognizer};
use crate::domain::recognition::{RecognitionErrorKind, RecognitionEvent, RecognizerOptions};

#[derive(Debug, Default)]
struct ConsoleState {
    listening: bool,
    destroyed: bool,
    options: RecognizerOptions,
}

struct Shared {
    state: Mutex<ConsoleState>,
    sink: EventSink,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: RecognitionEvent) {
        if self.sink.send(event).is_err() {
            debug!("Session gone, recognition event dropped");
        }
    }
}

/// Recognizer half, owned by the session
pub struct ConsoleRecognizer {
    shared: Arc<Shared>,
}

/// Input half, kept by the console host to feed typed utterances
#[derive(Clone)]
pub struct SpeechInput {
    shared: Arc<Shared>,
}

impl ConsoleRecognizer {
    /// Create a recognizer that reports into `sink`, plus its input half
    pub fn new(sink: EventSink) -> (Self, SpeechInput) {
        let shared = Arc::new(Shared {
            state: Mutex::new(ConsoleState::default()),
            sink,
        });
        (
            Self {
                shared: Arc::clone(&shared),
            },
            SpeechInput { shared },
        )
    }
}

#[async_trait]
impl SpeechRecognizer for ConsoleRecognizer {
    async fn start(&self, options: RecognizerOptions) -> Result<(), RecognizerError> {
        {
            let mut state = self.shared.lock();
            if state.destroyed {
                return Err(RecognizerError::StartFailed(
                    "recognizer was destroyed".to_string(),
                ));
            }
            if state.listening {
                return Err(RecognizerError::Busy);
            }
            state.listening = true;
            state.options = options;
        }

        self.shared.emit(RecognitionEvent::Ready);
        Ok(())
    }

    async fn stop(&self) -> Result<(), RecognizerError> {
        self.shared.lock().listening = false;
        Ok(())
    }

    async fn destroy(&self) {
        let mut state = self.shared.lock();
        state.listening = false;
        state.destroyed = true;
    }
}

impl SpeechInput {
    /// Whether an utterance would currently be heard
    pub fn is_listening(&self) -> bool {
        self.shared.lock().listening
    }

    /// Speak one utterance. Returns false if the recognizer is not listening.
    pub fn speak(&self, line: &str) -> bool {
        let options = {
            let mut state = self.shared.lock();
            if !state.listening {
                return false;
            }
            // One utterance per start, like a platform recognizer
            state.listening = false;
            state.options
        };

        let text = line.trim();
        if text.is_empty() {
            self.shared
                .emit(RecognitionEvent::Error(RecognitionErrorKind::NoMatch));
            return true;
        }

        if options.partial_results {
            let words: Vec<&str> = text.split_whitespace().collect();
            for n in 1..words.len() {
                self.shared
                    .emit(RecognitionEvent::PartialResult(words[..n].join(" ")));
            }
        }
        self.shared.emit(RecognitionEvent::EndOfSpeech);
        self.shared
            .emit(RecognitionEvent::FinalResult(text.to_string()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{event_channel, EventStream};

    fn drain(events: &mut EventStream) -> Vec<RecognitionEvent> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn start_emits_ready() {
        let (sink, mut events) = event_channel();
        let (recognizer, input) = ConsoleRecognizer::new(sink);

        recognizer.start(RecognizerOptions::default()).await.unwrap();
        assert!(input.is_listening());
        assert_eq!(drain(&mut events), vec![RecognitionEvent::Ready]);
    }

    #[tokio::test]
    async fn speak_while_idle_is_not_heard() {
        let (sink, mut events) = event_channel();
        let (_recognizer, input) = ConsoleRecognizer::new(sink);

        assert!(!input.speak("hello"));
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test]
    async fn utterance_emits_partials_then_end_then_final() {
        let (sink, mut events) = event_channel();
        let (recognizer, input) = ConsoleRecognizer::new(sink);
        recognizer.start(RecognizerOptions::default()).await.unwrap();
        drain(&mut events);

        assert!(input.speak("  turn on   the light "));
        assert_eq!(
            drain(&mut events),
            vec![
                RecognitionEvent::PartialResult("turn".to_string()),
                RecognitionEvent::PartialResult("turn on".to_string()),
                RecognitionEvent::PartialResult("turn on the".to_string()),
                RecognitionEvent::EndOfSpeech,
                RecognitionEvent::FinalResult("turn on   the light".to_string()),
            ]
        );
        assert!(!input.is_listening());
    }

    #[tokio::test]
    async fn partials_can_be_disabled() {
        let (sink, mut events) = event_channel();
        let (recognizer, input) = ConsoleRecognizer::new(sink);
        let options = RecognizerOptions {
            partial_results: false,
            ..Default::default()
        };
        recognizer.start(options).await.unwrap();
        drain(&mut events);

        input.speak("lights off");
        assert_eq!(
            drain(&mut events),
            vec![
                RecognitionEvent::EndOfSpeech,
                RecognitionEvent::FinalResult("lights off".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn blank_line_is_no_match() {
        let (sink, mut events) = event_channel();
        let (recognizer, input) = ConsoleRecognizer::new(sink);
        recognizer.start(RecognizerOptions::default()).await.unwrap();
        drain(&mut events);

        assert!(input.speak("   "));
        assert_eq!(
            drain(&mut events),
            vec![RecognitionEvent::Error(RecognitionErrorKind::NoMatch)]
        );
    }

    #[tokio::test]
    async fn second_start_is_busy() {
        let (sink, _events) = event_channel();
        let (recognizer, _input) = ConsoleRecognizer::new(sink);
        recognizer.start(RecognizerOptions::default()).await.unwrap();

        let err = recognizer
            .start(RecognizerOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecognizerError::Busy));
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let (sink, _events) = event_channel();
        let (recognizer, input) = ConsoleRecognizer::new(sink);
        recognizer.start(RecognizerOptions::default()).await.unwrap();

        recognizer.stop().await.unwrap();
        recognizer.stop().await.unwrap();
        assert!(!input.is_listening());
    }

    #[tokio::test]
    async fn destroyed_recognizer_cannot_start() {
        let (sink, _events) = event_channel();
        let (recognizer, input) = ConsoleRecognizer::new(sink);
        recognizer.start(RecognizerOptions::default()).await.unwrap();

        recognizer.destroy().await;
        assert!(!input.is_listening());
        let err = recognizer
            .start(RecognizerOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecognizerError::StartFailed(_)));
    }
}
