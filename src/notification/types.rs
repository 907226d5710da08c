//! Notification request/response types and their validation.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 140;

/// Notification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a notification request is rejected before any channel runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message too long ({0} chars), maximum is {max}", max = MAX_MESSAGE_CHARS)]
    MessageTooLong(usize),

    #[error("Invalid request body: {0}")]
    Malformed(String),
}

/// Wire shape of a `POST /notify` body, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyPayload {
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub source: Option<String>,
}

/// A validated notification.
///
/// The message is trimmed, non-empty and at most [`MAX_MESSAGE_CHARS`]
/// characters. Fields are private so this holds for the value's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    message: String,
    priority: Priority,
    source: Option<String>,
}

impl NotificationRequest {
    pub fn new(
        message: impl AsRef<str>,
        priority: Priority,
        source: Option<String>,
    ) -> Result<Self, ValidationError> {
        let raw = message.as_ref();
        let raw_len = raw.chars().count();
        if raw_len > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong(raw_len));
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        Ok(Self {
            message: trimmed.to_string(),
            priority,
            source,
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl TryFrom<NotifyPayload> for NotificationRequest {
    type Error = ValidationError;

    fn try_from(payload: NotifyPayload) -> Result<Self, Self::Error> {
        Self::new(payload.message, payload.priority, payload.source)
    }
}

/// Seconds since the Unix epoch, with sub-second precision.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Body returned by `POST /notify`, for success and failure alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    success: bool,
    message: String,
    timestamp: f64,
}

impl NotificationResponse {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            timestamp: unix_timestamp(),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: f64,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: unix_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_trimmed() {
        let req = NotificationRequest::new("  build finished \n", Priority::Low, None).unwrap();
        assert_eq!(req.message(), "build finished");
        assert_eq!(req.priority(), Priority::Low);
        assert!(req.source().is_none());
    }

    #[test]
    fn test_length_bounds() {
        let exact = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(NotificationRequest::new(&exact, Priority::Normal, None).is_ok());

        let long = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(
            NotificationRequest::new(&long, Priority::High, Some("ci".into())),
            Err(ValidationError::MessageTooLong(141))
        );

        // Length counts characters, not bytes.
        let wide = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(NotificationRequest::new(&wide, Priority::Normal, None).is_ok());
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        for msg in ["", "   ", "\t\n"] {
            assert_eq!(
                NotificationRequest::new(msg, Priority::Normal, None),
                Err(ValidationError::EmptyMessage)
            );
        }
    }

    #[test]
    fn test_payload_priority_parsing() {
        let payload: NotifyPayload = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(payload.priority, Priority::Normal);

        let payload: NotifyPayload =
            serde_json::from_str(r#"{"message":"hi","priority":"high","source":"agent-7"}"#)
                .unwrap();
        let req = NotificationRequest::try_from(payload).unwrap();
        assert_eq!(req.priority(), Priority::High);
        assert_eq!(req.source(), Some("agent-7"));

        assert!(serde_json::from_str::<NotifyPayload>(r#"{"message":"hi","priority":"urgent"}"#)
            .is_err());
    }

    #[test]
    fn test_response_serialization() {
        let resp = NotificationResponse::succeeded("Notification sent successfully");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Notification sent successfully");
        assert!(json["timestamp"].as_f64().unwrap() > 0.0);

        let health = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(health["status"], "healthy");
    }
}
