//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;

use crate::domain::session::{SessionError, SessionSnapshot, SessionState};

/// A visible difference between two published snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotChange {
    State(SessionState),
    Partial(String),
    Final(String),
    /// Finals published too close together to be shown one by one
    Skipped(u64),
    Error(SessionError),
}

/// Diff two snapshots into the lines worth showing
pub fn snapshot_changes(prev: &SessionSnapshot, next: &SessionSnapshot) -> Vec<SnapshotChange> {
    let mut changes = Vec::new();

    if next.utterances != prev.utterances {
        let missed = next.utterances.saturating_sub(prev.utterances + 1);
        if missed > 0 {
            changes.push(SnapshotChange::Skipped(missed));
        }
        changes.push(SnapshotChange::Final(next.last_text.clone()));
    } else if next.last_text != prev.last_text && !next.last_text.is_empty() {
        changes.push(SnapshotChange::Partial(next.last_text.clone()));
    }

    if next.last_error != prev.last_error {
        if let Some(error) = &next.last_error {
            changes.push(SnapshotChange::Error(error.clone()));
        }
    }

    if next.state != prev.state {
        changes.push(SnapshotChange::State(next.state));
    }

    changes
}

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (recognized text, config values)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Prompt on stderr without newline
    pub fn prompt(&self, text: &str) {
        eprint!("{} ", text.bold());
        let _ = io::stderr().flush();
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print session state
    pub fn session_state(&self, state: SessionState) {
        let marker = match state {
            SessionState::Unauthorized => "●".dimmed(),
            SessionState::Idle => "●".cyan(),
            SessionState::Listening => "●".red(),
        };
        eprintln!("{} Session: {}", marker, state);
    }

    /// Print a full status block
    pub fn status(&self, snapshot: &SessionSnapshot) {
        self.session_state(snapshot.state);
        self.key_value(
            "last_text",
            if snapshot.last_text.is_empty() {
                "(none)"
            } else {
                &snapshot.last_text
            },
        );
        self.key_value(
            "last_error",
            &snapshot
                .last_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "(none)".to_string()),
        );
    }

    /// Render one snapshot change
    pub fn change(&self, change: &SnapshotChange) {
        match change {
            SnapshotChange::State(state) => self.session_state(*state),
            SnapshotChange::Partial(text) => eprintln!("{} {}", "…".dimmed(), text.dimmed()),
            SnapshotChange::Final(text) => self.output(text),
            SnapshotChange::Skipped(count) => {
                self.warn(&format!("{} earlier utterance(s) recognized but not shown", count))
            }
            SnapshotChange::Error(error) => self.error(&error.to_string()),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dispatch::DispatchError;
    use crate::domain::recognition::RecognitionErrorKind;
    use crate::domain::session::RecordingState;

    fn listening(text: &str) -> SessionSnapshot {
        SessionSnapshot {
            state: SessionState::Listening,
            recording: RecordingState::Listening,
            last_text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let snap = listening("turn");
        assert!(snapshot_changes(&snap, &snap.clone()).is_empty());
    }

    #[test]
    fn text_while_listening_is_partial() {
        let changes = snapshot_changes(&listening(""), &listening("turn"));
        assert_eq!(changes, vec![SnapshotChange::Partial("turn".to_string())]);
    }

    #[test]
    fn final_result_is_reported_with_state() {
        let prev = listening("turn on");
        let next = SessionSnapshot {
            state: SessionState::Idle,
            recording: RecordingState::Idle,
            last_text: "turn on the light".to_string(),
            utterances: 1,
            ..Default::default()
        };

        assert_eq!(
            snapshot_changes(&prev, &next),
            vec![
                SnapshotChange::Final("turn on the light".to_string()),
                SnapshotChange::State(SessionState::Idle),
            ]
        );
    }

    #[test]
    fn repeated_final_text_is_still_reported() {
        let prev = SessionSnapshot {
            state: SessionState::Idle,
            last_text: "lights".to_string(),
            utterances: 1,
            ..Default::default()
        };
        let next = SessionSnapshot {
            utterances: 2,
            ..prev.clone()
        };
        assert_eq!(
            snapshot_changes(&prev, &next),
            vec![SnapshotChange::Final("lights".to_string())]
        );
    }

    #[test]
    fn finals_published_together_report_skipped_text() {
        let prev = SessionSnapshot {
            state: SessionState::Idle,
            last_text: "lights on".to_string(),
            utterances: 1,
            ..Default::default()
        };
        let next = SessionSnapshot {
            last_text: "lights off".to_string(),
            utterances: 4,
            ..prev.clone()
        };
        assert_eq!(
            snapshot_changes(&prev, &next),
            vec![
                SnapshotChange::Skipped(2),
                SnapshotChange::Final("lights off".to_string()),
            ]
        );
    }

    #[test]
    fn cleared_text_is_silent() {
        let changes = snapshot_changes(&listening("old"), &listening(""));
        assert!(changes.is_empty());
    }

    #[test]
    fn new_error_is_reported() {
        let prev = listening("");
        let next = SessionSnapshot {
            state: SessionState::Idle,
            recording: RecordingState::Idle,
            last_error: Some(SessionError::Recognition(RecognitionErrorKind::Network)),
            ..Default::default()
        };

        assert_eq!(
            snapshot_changes(&prev, &next),
            vec![
                SnapshotChange::Error(SessionError::Recognition(RecognitionErrorKind::Network)),
                SnapshotChange::State(SessionState::Idle),
            ]
        );
    }

    #[test]
    fn replaced_error_is_reported_again() {
        let prev = SessionSnapshot {
            state: SessionState::Idle,
            last_error: Some(SessionError::Dispatch(DispatchError::Status(500))),
            ..Default::default()
        };
        let next = SessionSnapshot {
            last_error: Some(SessionError::Dispatch(DispatchError::Timeout)),
            ..prev.clone()
        };
        assert_eq!(snapshot_changes(&prev, &next).len(), 1);
    }
}
