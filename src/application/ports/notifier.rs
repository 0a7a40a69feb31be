//! Desktop notification port

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// How serious a notice is. Selects icon and urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Degraded but usable, e.g. microphone access refused
    Warning,
    /// Something the user tried did not happen
    Failure,
}

impl NotificationLevel {
    /// freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Warning => "dialog-warning",
            Self::Failure => "dialog-error",
        }
    }

    pub const fn is_critical(&self) -> bool {
        matches!(self, Self::Failure)
    }
}

/// Out-of-band notices about recognition and delivery failures
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<(), NotificationError>;
}

#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<(), NotificationError> {
        self.as_ref().notify(title, message, level).await
    }
}
