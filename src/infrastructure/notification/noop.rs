//! No-op notifier

use async_trait::async_trait;

use crate::application::ports::{NotificationError, NotificationLevel, Notifier};

/// Notifier that shows nothing
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(
        &self,
        _title: &str,
        _message: &str,
        _level: NotificationLevel,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}
