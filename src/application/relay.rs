//! Capture-and-dispatch use case
//!
//! [`RelaySession`] is the single writer of the [`Session`]. UI commands and
//! recognizer events are marshaled onto it through channels, every effect the
//! state machine asks for is carried out here, and a [`SessionSnapshot`] is
//! published after each transition.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::domain::dispatch::{DispatchOutcome, DispatchRequest};
use crate::domain::error::PinError;
use crate::domain::recognition::{RecognitionErrorKind, RecognitionEvent, RecognizerOptions};
use crate::domain::session::{Effect, InvalidStateTransition, Session, SessionSnapshot};

use super::ports::{Dispatcher, EventStream, NotificationLevel, Notifier, SpeechRecognizer};

const COMMAND_BUFFER: usize = 16;
const NOTIFY_TITLE: &str = "VoiceRelay";
// How long teardown waits for notifications still being shown
const NOTICE_GRACE: Duration = Duration::from_secs(1);

/// Commands the UI sends into the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Replace the PIN field contents
    EnterPin(String),
    Start,
    Stop,
    /// Tear the session down
    Quit,
}

/// Errors from rejected commands
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("PIN rejected: {0}")]
    Pin(#[from] PinError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// The session loop has shut down
#[derive(Debug, Clone, Copy, Error)]
#[error("Session has shut down")]
pub struct SessionClosed;

/// Configuration for the relay session
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Options passed to every recognizer start
    pub recognizer: RecognizerOptions,
    /// Whether to show desktop notifications for failures
    pub enable_notify: bool,
}

/// UI-side handle: sends commands, observes published state
#[derive(Debug, Clone)]
pub struct RelayHandle {
    commands: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<SessionSnapshot>,
}

impl RelayHandle {
    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionClosed> {
        self.commands.send(command).await.map_err(|_| SessionClosed)
    }

    pub async fn enter_pin(&self, digits: impl Into<String>) -> Result<(), SessionClosed> {
        self.send(SessionCommand::EnterPin(digits.into())).await
    }

    pub async fn start(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Start).await
    }

    pub async fn stop(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Stop).await
    }

    pub async fn quit(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Quit).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified after every visible change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.clone()
    }
}

/// Capture-and-dispatch session driver
pub struct RelaySession<R, D, N>
where
    R: SpeechRecognizer,
    D: Dispatcher + 'static,
    N: Notifier + 'static,
{
    session: Session,
    recognizer: R,
    dispatcher: Arc<D>,
    notifier: Arc<N>,
    config: RelayConfig,
    events: EventStream,
    commands: mpsc::Receiver<SessionCommand>,
    in_flight: JoinSet<DispatchOutcome>,
    notices: JoinSet<()>,
    published: watch::Sender<SessionSnapshot>,
    closed: bool,
}

impl<R, D, N> RelaySession<R, D, N>
where
    R: SpeechRecognizer,
    D: Dispatcher + 'static,
    N: Notifier + 'static,
{
    /// Create a session owning `recognizer`, whose events arrive on `events`
    pub fn new(
        recognizer: R,
        events: EventStream,
        dispatcher: D,
        notifier: N,
        config: RelayConfig,
    ) -> (Self, RelayHandle) {
        let session = Session::new();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(session.snapshot());

        let relay = Self {
            session,
            recognizer,
            dispatcher: Arc::new(dispatcher),
            notifier: Arc::new(notifier),
            config,
            events,
            commands: command_rx,
            in_flight: JoinSet::new(),
            notices: JoinSet::new(),
            published: state_tx,
            closed: false,
        };
        let handle = RelayHandle {
            commands: command_tx,
            state: state_rx,
        };
        (relay, handle)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Number of dispatches still waiting for a response
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Process commands, events and dispatch completions until quit
    pub async fn run(mut self) {
        if !self.recognizer.permission_granted() {
            warn!("Microphone permission not granted, recognition will not start");
            self.notify("Microphone access denied", NotificationLevel::Warning);
        }
        self.publish();

        while !self.closed {
            // Events already queued are applied before the next command, so a
            // quit never overtakes an utterance that was spoken before it.
            tokio::select! {
                biased;

                event = self.events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        warn!("Recognizer event stream closed");
                        self.handle_quit().await;
                    }
                },
                Some(joined) = self.in_flight.join_next() => {
                    self.finish_dispatch(joined);
                }
                Some(joined) = self.notices.join_next() => {
                    if let Err(e) = joined {
                        debug!(error = %e, "Notification task did not complete");
                    }
                }
                command = self.commands.recv() => match command {
                    Some(command) => {
                        if let Err(e) = self.handle_command(command).await {
                            warn!(error = %e, "Command rejected");
                        }
                    }
                    None => {
                        debug!("Command channel closed");
                        self.handle_quit().await;
                    }
                },
            }
        }

        self.drain().await;
        info!("Session closed");
    }

    /// Apply one UI command
    pub async fn handle_command(&mut self, command: SessionCommand) -> Result<(), RelayError> {
        match command {
            SessionCommand::EnterPin(digits) => {
                self.session.enter_pin(&digits)?;
                if self.session.is_authorized() {
                    info!("PIN accepted, session authorized");
                }
                self.publish();
            }
            SessionCommand::Start => {
                let effects = self.session.start()?;
                info!("Listening started");
                self.apply(effects).await;
            }
            SessionCommand::Stop => {
                let effects = self.session.stop();
                self.apply(effects).await;
            }
            SessionCommand::Quit => self.handle_quit().await,
        }
        Ok(())
    }

    /// Apply one recognizer event
    pub async fn handle_event(&mut self, event: RecognitionEvent) {
        debug!(
            event = event.name(),
            state = %self.session.state(),
            "Recognition event"
        );

        if let RecognitionEvent::Error(kind) = &event {
            if self.session.is_authorized() {
                if kind.restarts_listening() {
                    info!(error = %kind, "Nothing recognized, listening again");
                } else {
                    warn!(error = %kind, "Recognition failed");
                    self.notify(kind.message(), NotificationLevel::Failure);
                }
            }
        }

        let effects = self.session.handle_event(event);
        self.apply(effects).await;
    }

    /// Wait for every in-flight dispatch and record its outcome
    pub async fn wait_for_dispatches(&mut self) {
        while let Some(joined) = self.in_flight.join_next().await {
            self.finish_dispatch(joined);
        }
    }

    async fn apply(&mut self, effects: Vec<Effect>) {
        let mut pending: VecDeque<Effect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::StartRecognizer => {
                    if let Err(e) = self.recognizer.start(self.config.recognizer).await {
                        warn!(error = %e, "Recognizer failed to start");
                        self.start_failed(e.kind());
                    }
                }
                Effect::StopRecognizer => {
                    if let Err(e) = self.recognizer.stop().await {
                        warn!(error = %e, "Recognizer failed to stop");
                    }
                }
                Effect::Dispatch(request) => self.spawn_dispatch(request),
            }
        }

        self.publish();
    }

    fn spawn_dispatch(&mut self, request: DispatchRequest) {
        debug!(chars = request.text().chars().count(), "Dispatching utterance");
        let dispatcher = Arc::clone(&self.dispatcher);
        self.in_flight.spawn(async move {
            DispatchOutcome::from(dispatcher.send(&request).await)
        });
    }

    fn start_failed(&mut self, kind: RecognitionErrorKind) {
        self.session.start_failed(kind);
        self.notify(kind.message(), NotificationLevel::Failure);
    }

    fn finish_dispatch(&mut self, joined: Result<DispatchOutcome, JoinError>) {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Dispatch task did not complete");
                return;
            }
        };

        match &outcome {
            DispatchOutcome::Ok => info!("Utterance delivered"),
            DispatchOutcome::Failed(e) => {
                warn!(error = %e, "Utterance dropped");
                self.notify(&format!("Sending failed: {}", e), NotificationLevel::Failure);
            }
        }

        self.session.record_dispatch(&outcome);
        self.publish();
    }

    async fn handle_quit(&mut self) {
        if self.closed {
            return;
        }
        if self.session.is_listening() {
            let effects = self.session.stop();
            self.apply(effects).await;
        }
        self.recognizer.destroy().await;
        self.closed = true;
        info!("Recognizer released");
    }

    // Outcomes of dispatches that finish after teardown are not published.
    async fn drain(&mut self) {
        while let Some(joined) = self.in_flight.join_next().await {
            match joined {
                Ok(outcome) => debug!(delivered = outcome.is_ok(), "Late dispatch finished"),
                Err(e) => warn!(error = %e, "Dispatch task did not complete"),
            }
        }

        let notices = &mut self.notices;
        let shown = async { while notices.join_next().await.is_some() {} };
        if tokio::time::timeout(NOTICE_GRACE, shown).await.is_err() {
            debug!(pending = self.notices.len(), "Abandoning pending notifications");
            self.notices.shutdown().await;
        }
    }

    fn publish(&self) {
        let snapshot = self.session.snapshot();
        self.published.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    // Shown off the loop; a slow notification daemon must not stall the session.
    fn notify(&mut self, message: &str, level: NotificationLevel) {
        if !self.config.enable_notify {
            return;
        }
        let notifier = Arc::clone(&self.notifier);
        let message = message.to_string();
        self.notices.spawn(async move {
            if let Err(e) = notifier.notify(NOTIFY_TITLE, &message, level).await {
                debug!(error = %e, "Notification failed");
            }
        });
    }
}
