//! Two-channel notification dispatch.
//!
//! ```text
//! NotificationRequest
//!     → AudioChannel (mandatory; error ends the dispatch)
//!     → VisualChannel (if enabled; outcome logged, never fatal)
//!     → DispatchReport
//! ```

use std::time::Instant;

use thiserror::Error;

use crate::config::NotifyConfig;
use crate::notification::channels::{AudioChannel, AudioError, VisualChannel, VisualOutcome};
use crate::notification::types::{NotificationRequest, Priority};
use crate::observability::metrics;

const DEMO_MESSAGE: &str = "Agent notify is ready";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("audio notification failed: {0}")]
    Audio(#[from] AudioError),

    #[error("dispatch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// What happened on a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// `None` when the visual channel is disabled.
    pub visual: Option<VisualOutcome>,
}

pub struct NotificationDispatcher {
    audio: AudioChannel,
    visual: Option<VisualChannel>,
}

impl NotificationDispatcher {
    pub fn new(audio: AudioChannel, visual: Option<VisualChannel>) -> Self {
        Self { audio, visual }
    }

    /// Dispatcher with the production backends described by `config`.
    pub fn from_config(config: &NotifyConfig) -> Self {
        let visual = config
            .visual
            .enabled
            .then(|| VisualChannel::from_config(&config.visual));
        Self::new(AudioChannel::from_config(&config.speech), visual)
    }

    pub fn visual_enabled(&self) -> bool {
        self.visual.is_some()
    }

    /// Deliver a validated notification. Succeeds iff the audio channel does.
    pub async fn dispatch(
        &self,
        request: &NotificationRequest,
    ) -> Result<DispatchReport, DispatchError> {
        let start = Instant::now();

        if let Err(e) = self.audio.deliver(request.message()).await {
            tracing::error!(
                source = request.source().unwrap_or("-"),
                priority = %request.priority(),
                error = %e,
                "Audio notification failed"
            );
            metrics::record_channel_failure("audio");
            metrics::record_dispatch(start);
            return Err(e.into());
        }

        let visual = match &self.visual {
            Some(channel) => {
                let outcome = channel.deliver(request.message(), request.priority()).await;
                if let VisualOutcome::Degraded(reason) = &outcome {
                    tracing::warn!(reason = %reason, "Visual notification failed, continuing");
                    metrics::record_channel_failure("visual");
                }
                Some(outcome)
            }
            None => None,
        };

        metrics::record_dispatch(start);
        tracing::debug!(
            source = request.source().unwrap_or("-"),
            priority = %request.priority(),
            "Notification dispatched"
        );

        Ok(DispatchReport { visual })
    }

    /// Send the readiness message.
    pub async fn demo(&self) -> Result<DispatchReport, DispatchError> {
        let request = NotificationRequest::new(DEMO_MESSAGE, Priority::Normal, Some("demo".into()))
            .expect("demo message is a valid notification");
        self.dispatch(&request).await
    }
}
