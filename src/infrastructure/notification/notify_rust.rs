//! notify-rust backed desktop notifications

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::application::ports::{NotificationError, NotificationLevel, Notifier};

const APP_NAME: &str = "VoiceRelay";
const EXPIRE_MS: u32 = 5000;

pub struct NotifyRustNotifier {
    app_name: String,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self::with_app_name(APP_NAME)
    }

    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    fn build(&self, title: &str, message: &str, level: NotificationLevel) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(title)
            .body(message)
            .icon(level.icon_name())
            .timeout(Timeout::Milliseconds(EXPIRE_MS));
        #[cfg(all(unix, not(target_os = "macos")))]
        if level.is_critical() {
            notification.urgency(notify_rust::Urgency::Critical);
        }
        notification
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<(), NotificationError> {
        let notification = self.build(title, message, level);

        // show() blocks on the session bus
        tokio::task::spawn_blocking(move || {
            notification
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}
