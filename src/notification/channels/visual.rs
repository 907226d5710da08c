//! Visual channel: desktop popup via notify-rust.
//!
//! Best-effort. Failures come back as [`VisualOutcome::Degraded`] instead of
//! an error so callers cannot accidentally let them fail a dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use notify_rust::Notification;
use thiserror::Error;

use crate::config::VisualConfig;
use crate::notification::types::Priority;

const APP_NAME: &str = "agent-notify";
const HIGH_PRIORITY_SUFFIX: &str = " (High Priority)";
const ALERT_SOUND: &str = "default";

#[derive(Debug, Error)]
pub enum VisualError {
    #[error("desktop notification failed: {0}")]
    Backend(String),

    #[error("desktop notification task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A popup ready to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub body: String,
    /// Play the alert sound.
    pub alert: bool,
}

/// Result of one visual delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualOutcome {
    Delivered,
    /// The popup could not be shown; the reason is kept for logging only.
    Degraded(String),
}

#[async_trait]
pub trait DesktopNotifier: Send + Sync {
    async fn show(&self, popup: &Popup) -> Result<(), VisualError>;
}

/// Native desktop notifications (D-Bus on Linux, Notification Center on macOS).
#[derive(Debug, Clone, Default)]
pub struct SystemNotifier;

#[async_trait]
impl DesktopNotifier for SystemNotifier {
    async fn show(&self, popup: &Popup) -> Result<(), VisualError> {
        let popup = popup.clone();
        // notify-rust blocks on the platform call.
        tokio::task::spawn_blocking(move || {
            let mut notification = Notification::new();
            notification
                .appname(APP_NAME)
                .summary(&popup.title)
                .body(&popup.body);
            if popup.alert {
                notification.sound_name(ALERT_SOUND);
            }
            notification
                .show()
                .map(|_| ())
                .map_err(|e| VisualError::Backend(e.to_string()))
        })
        .await?
    }
}

#[derive(Clone)]
pub struct VisualChannel {
    notifier: Arc<dyn DesktopNotifier>,
    title: String,
}

impl VisualChannel {
    pub fn new(notifier: Arc<dyn DesktopNotifier>, config: &VisualConfig) -> Self {
        Self {
            notifier,
            title: config.title.clone(),
        }
    }

    pub fn from_config(config: &VisualConfig) -> Self {
        Self::new(Arc::new(SystemNotifier), config)
    }

    /// Popup for a message. High priority gets a title suffix and a sound.
    pub fn popup(&self, message: &str, priority: Priority) -> Popup {
        let high = priority == Priority::High;
        let mut title = self.title.clone();
        if high {
            title.push_str(HIGH_PRIORITY_SUFFIX);
        }
        Popup {
            title,
            body: message.to_string(),
            alert: high,
        }
    }

    pub async fn deliver(&self, message: &str, priority: Priority) -> VisualOutcome {
        let popup = self.popup(message, priority);
        match self.notifier.show(&popup).await {
            Ok(()) => VisualOutcome::Delivered,
            Err(e) => VisualOutcome::Degraded(e.to_string()),
        }
    }
}
