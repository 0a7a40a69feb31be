//! Console host: terminal UI around a relay session
//!
//! Lines typed before the session is authorized are PIN digits. After that,
//! `/`-prefixed lines are commands and anything else is "spoken" into the
//! console recognizer.

use std::io::BufRead;
use std::process::ExitCode;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::application::ports::{event_channel, SpeechRecognizer};
use crate::application::{RelayConfig, RelayHandle, RelaySession, SessionClosed};
use crate::domain::error::PinError;
use crate::domain::pin::{Pin, PIN_LENGTH};
use crate::domain::session::{RecordingState, SessionError, SessionSnapshot};
use crate::infrastructure::{create_notifier, ConsoleRecognizer, HttpDispatcher, SpeechInput};

use super::app::{EXIT_ERROR, EXIT_SUCCESS};
use super::args::ConsoleOptions;
use super::presenter::{snapshot_changes, Presenter};
use super::signals::ShutdownSignal;

const STDIN_BUFFER: usize = 16;
// Upper bound on waiting for /start or /stop to take effect
const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

const HELP: &[(&str, &str)] = &[
    ("/start", "start listening"),
    ("/stop", "stop listening"),
    ("/status", "show session state"),
    ("/quit", "exit"),
    ("/help", "show this help"),
];

/// One line of console input, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Digits to append to the PIN entered so far
    PinDigits(String),
    Start,
    Stop,
    Status,
    Quit,
    Help,
    /// Unrecognized `/command`
    Unknown(String),
    /// An utterance for the recognizer
    Speech(String),
}

/// Interpret a line. Before authorization every non-command line is PIN input.
pub fn parse_input(line: &str, authorized: bool) -> ConsoleInput {
    let trimmed = line.trim();

    if let Some(command) = trimmed.strip_prefix('/') {
        return match command.to_ascii_lowercase().as_str() {
            "start" => ConsoleInput::Start,
            "stop" => ConsoleInput::Stop,
            "status" => ConsoleInput::Status,
            "quit" | "exit" => ConsoleInput::Quit,
            "help" => ConsoleInput::Help,
            _ => ConsoleInput::Unknown(trimmed.to_string()),
        };
    }

    if authorized {
        ConsoleInput::Speech(line.to_string())
    } else {
        ConsoleInput::PinDigits(trimmed.to_string())
    }
}

/// PIN field contents after appending `digits`, or why they are rejected
pub fn append_pin(current: &str, digits: &str) -> Result<String, PinError> {
    let candidate = format!("{}{}", current, digits);
    Pin::validate(&candidate)?;
    Ok(candidate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct ConsoleHost {
    handle: RelayHandle,
    speech: SpeechInput,
    presenter: Presenter,
    // Mirrors what was sent as EnterPin, so input can be classified without
    // waiting for the session to publish.
    pin: String,
}

impl ConsoleHost {
    fn authorized(&self) -> bool {
        self.pin.len() == PIN_LENGTH
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow, SessionClosed> {
        match parse_input(line, self.authorized()) {
            ConsoleInput::PinDigits(digits) => self.enter_pin(&digits).await?,
            ConsoleInput::Quit => return Ok(Flow::Quit),
            ConsoleInput::Help => self.help(),
            ConsoleInput::Unknown(command) => {
                self.presenter
                    .warn(&format!("Unknown command {}. Type /help for commands", command));
            }
            _ if !self.authorized() => self.presenter.warn("Enter the PIN first"),
            ConsoleInput::Start => self.start().await?,
            ConsoleInput::Stop => self.stop().await?,
            ConsoleInput::Status => self.presenter.status(&self.handle.snapshot()),
            ConsoleInput::Speech(text) => {
                if !self.speech.speak(&text) && !text.trim().is_empty() {
                    self.presenter.info("Not listening. Type /start first");
                }
            }
        }
        Ok(Flow::Continue)
    }

    async fn enter_pin(&mut self, digits: &str) -> Result<(), SessionClosed> {
        if digits.is_empty() {
            return Ok(());
        }

        match append_pin(&self.pin, digits) {
            Ok(pin) => {
                self.pin = pin;
                self.handle.enter_pin(self.pin.clone()).await?;
                if self.authorized() {
                    info!("Session authorized");
                    self.presenter
                        .success("PIN accepted. Type /start to listen, /help for commands");
                } else {
                    self.presenter.prompt(&format!(
                        "PIN ({}/{}):",
                        self.pin.len(),
                        PIN_LENGTH
                    ));
                }
            }
            Err(e) => {
                self.presenter.warn(&e.to_string());
                self.presenter.prompt(&format!(
                    "PIN ({}/{}):",
                    self.pin.len(),
                    PIN_LENGTH
                ));
            }
        }
        Ok(())
    }

    // The next line may be speech, so wait until the recognizer is live
    // (or refused) before reading it.
    async fn start(&self) -> Result<(), SessionClosed> {
        if self.handle.snapshot().recording == RecordingState::Listening {
            return self.handle.start().await;
        }
        let state = self.watch();
        self.handle.start().await?;
        settle(state, |s| {
            s.recording == RecordingState::Listening
                || matches!(s.last_error, Some(SessionError::Recognition(_)))
        })
        .await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), SessionClosed> {
        if self.handle.snapshot().recording == RecordingState::Idle {
            return self.handle.stop().await;
        }
        let state = self.watch();
        self.handle.stop().await?;
        settle(state, |s| s.recording == RecordingState::Idle).await;
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        let mut state = self.handle.subscribe();
        state.borrow_and_update();
        state
    }

    fn help(&self) {
        for (command, description) in HELP {
            self.presenter.key_value(command, description);
        }
    }
}

/// Wait for the first published change that satisfies `done`
async fn settle(
    mut state: watch::Receiver<SessionSnapshot>,
    done: impl Fn(&SessionSnapshot) -> bool,
) {
    let wait = async {
        while state.changed().await.is_ok() {
            if done(&state.borrow_and_update()) {
                return;
            }
        }
    };
    if tokio::time::timeout(SETTLE_TIMEOUT, wait).await.is_err() {
        debug!("Session did not settle in time");
    }
}

/// Read stdin on a blocking thread and forward lines to an async channel.
/// The channel closes on end of input.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(STDIN_BUFFER);

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
        debug!("Stdin reader finished");
    });

    rx
}

/// Print every published change until the session shuts down
async fn render_changes(mut state: watch::Receiver<SessionSnapshot>) {
    let presenter = Presenter::new();
    let mut prev = state.borrow_and_update().clone();

    while state.changed().await.is_ok() {
        let next = state.borrow_and_update().clone();
        for change in snapshot_changes(&prev, &next) {
            presenter.change(&change);
        }
        prev = next;
    }
}

/// Run the console host until quit, end of input or a shutdown signal
pub async fn run_console(options: ConsoleOptions) -> ExitCode {
    let presenter = Presenter::new();

    let dispatcher = match HttpDispatcher::with_timeout(options.endpoint.clone(), options.timeout)
    {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            presenter.error(&format!("Failed to create HTTP client: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut shutdown = match ShutdownSignal::new() {
        Ok(shutdown) => shutdown,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (sink, events) = event_channel();
    let (recognizer, speech) = ConsoleRecognizer::new(sink);
    if !recognizer.permission_granted() {
        presenter.warn("Microphone permission not granted. Recognition will not start");
    }

    let config = RelayConfig {
        recognizer: options.recognizer,
        enable_notify: options.notify,
    };
    let (relay, handle) = RelaySession::new(
        recognizer,
        events,
        dispatcher,
        create_notifier(options.notify),
        config,
    );

    let relay_task = tokio::spawn(relay.run());
    let renderer = tokio::spawn(render_changes(handle.subscribe()));

    info!(endpoint = %options.endpoint, timeout = %options.timeout, "Console host started");
    presenter.info(&format!("Relaying to {}", options.endpoint.url()));
    presenter.prompt(&format!("PIN (0/{}):", PIN_LENGTH));

    let mut host = ConsoleHost {
        handle: handle.clone(),
        speech,
        presenter: Presenter::new(),
        pin: String::new(),
    };
    let mut lines = spawn_stdin_reader();

    loop {
        tokio::select! {
            signal = shutdown.recv() => {
                if let Some(signal) = signal {
                    presenter.info(&format!("Received {}, shutting down", signal.name()));
                }
                break;
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("End of input");
                    break;
                };
                match host.handle_line(&line).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(e) => {
                        warn!(error = %e, "Session ended unexpectedly");
                        break;
                    }
                }
            }
        }
    }

    // The session may already be gone; quitting twice is harmless.
    let _ = handle.quit().await;
    drop(host);
    drop(handle);

    if let Err(e) = relay_task.await {
        presenter.error(&format!("Session task failed: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let _ = renderer.await;

    presenter.info("Goodbye");
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dispatch::Endpoint;

    #[test]
    fn lines_before_authorization_are_pin_digits() {
        assert_eq!(
            parse_input(" 048 ", false),
            ConsoleInput::PinDigits("048".to_string())
        );
    }

    #[test]
    fn lines_after_authorization_are_speech() {
        assert_eq!(
            parse_input("turn on the light", true),
            ConsoleInput::Speech("turn on the light".to_string())
        );
        assert_eq!(parse_input("", true), ConsoleInput::Speech(String::new()));
    }

    #[test]
    fn commands_parse_in_any_state() {
        assert_eq!(parse_input("/start", true), ConsoleInput::Start);
        assert_eq!(parse_input("/STOP", true), ConsoleInput::Stop);
        assert_eq!(parse_input(" /status ", true), ConsoleInput::Status);
        assert_eq!(parse_input("/quit", false), ConsoleInput::Quit);
        assert_eq!(parse_input("/help", false), ConsoleInput::Help);
        assert_eq!(
            parse_input("/dance", true),
            ConsoleInput::Unknown("/dance".to_string())
        );
    }

    #[test]
    fn pin_is_appended() {
        let pin = append_pin("", "04").unwrap();
        let pin = append_pin(&pin, "8275").unwrap();
        assert_eq!(pin, "048275");
    }

    #[test]
    fn rejected_pin_input_leaves_pin_alone() {
        assert_eq!(append_pin("048", "2x"), Err(PinError::NonDigit));
        assert_eq!(append_pin("048", "2750"), Err(PinError::TooLong));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn speech_right_after_start_is_heard() {
        for _ in 0..20 {
            let (sink, events) = event_channel();
            let (recognizer, speech) = ConsoleRecognizer::new(sink);
            let dispatcher =
                HttpDispatcher::new(Endpoint::new("127.0.0.1", 9, "/type")).unwrap();
            let (relay, handle) = RelaySession::new(
                recognizer,
                events,
                dispatcher,
                create_notifier(false),
                RelayConfig::default(),
            );
            let relay_task = tokio::spawn(relay.run());

            let mut host = ConsoleHost {
                handle: handle.clone(),
                speech,
                presenter: Presenter::new(),
                pin: String::new(),
            };
            host.handle_line("048275").await.unwrap();
            host.handle_line("/start").await.unwrap();
            assert!(host.speech.speak("turn on the light"));
            handle
                .subscribe()
                .wait_for(|s| s.utterances == 1)
                .await
                .unwrap();

            host.handle_line("/start").await.unwrap();
            host.handle_line("/stop").await.unwrap();
            assert!(!host.speech.speak("too late"));

            handle.quit().await.unwrap();
            relay_task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn host_authorizes_after_six_digits() {
        let (sink, events) = event_channel();
        let (recognizer, speech) = ConsoleRecognizer::new(sink);
        let dispatcher = HttpDispatcher::new(Endpoint::new("127.0.0.1", 9, "/type")).unwrap();
        let (relay, handle) = RelaySession::new(
            recognizer,
            events,
            dispatcher,
            create_notifier(false),
            RelayConfig::default(),
        );
        let relay_task = tokio::spawn(relay.run());

        let mut host = ConsoleHost {
            handle: handle.clone(),
            speech,
            presenter: Presenter::new(),
            pin: String::new(),
        };

        assert_eq!(host.handle_line("048").await.unwrap(), Flow::Continue);
        assert!(!host.authorized());
        host.handle_line("abc").await.unwrap();
        assert_eq!(host.pin, "048");
        host.handle_line("275").await.unwrap();
        assert!(host.authorized());

        host.handle_line("/start").await.unwrap();
        let mut state = handle.subscribe();
        state
            .wait_for(|s| s.recording == RecordingState::Listening)
            .await
            .unwrap();
        assert!(host.speech.is_listening());

        assert_eq!(host.handle_line("/quit").await.unwrap(), Flow::Quit);
        handle.quit().await.unwrap();
        relay_task.await.unwrap();
    }
}
