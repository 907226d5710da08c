use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_URL: &str = "http://127.0.0.1:8765";
pub const MAX_MESSAGE_CHARS: usize = 140;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const FALLBACK_PREFIX: &str = "[agent-notify]";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        })
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("message is {0} characters, the limit is {max}", max = MAX_MESSAGE_CHARS)]
    MessageTooLong(usize),

    #[error("invalid authentication token")]
    Unauthorized,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("server returned {status}: {message}")]
    Server { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct NotifyRequest<'a> {
    message: &'a str,
    priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

/// Body of every `/notify` response, success or failure.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone)]
pub struct NotifyClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    timeout: Duration,
    fallback_print: bool,
}

impl Default for NotifyClient {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl NotifyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            fallback_print: true,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Per-request timeout (5 seconds by default).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether [`notify`](Self::notify) writes to the console when the
    /// server cannot be reached. On by default.
    pub fn with_fallback_print(mut self, enabled: bool) -> Self {
        self.fallback_print = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one notification. Messages over the limit are refused locally.
    pub async fn send_notification(
        &self,
        message: &str,
        priority: Priority,
        source: Option<&str>,
    ) -> Result<NotifyResponse, ClientError> {
        let chars = message.chars().count();
        if chars > MAX_MESSAGE_CHARS {
            return Err(ClientError::MessageTooLong(chars));
        }

        let mut req = self
            .client
            .post(format!("{}/notify", self.base_url))
            .timeout(self.timeout)
            .json(&NotifyRequest {
                message,
                priority,
                source,
            });
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited),
            s if s.is_success() => Ok(resp.json::<NotifyResponse>().await?),
            _ => {
                let text = resp.text().await?;
                let message = serde_json::from_str::<NotifyResponse>(&text)
                    .map(|body| body.message)
                    .unwrap_or(text);
                Err(ClientError::Server { status, message })
            }
        }
    }

    /// Fetch `/health`.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    /// `true` when the server answers `/health` with a success status.
    pub async fn health_check(&self) -> bool {
        self.health().await.is_ok()
    }

    /// Fire-and-forget helper for agents: long messages are truncated, and
    /// when delivery fails the message is printed to stdout instead (unless
    /// disabled with [`with_fallback_print`](Self::with_fallback_print)).
    ///
    /// Returns whether the server accepted the notification.
    pub async fn notify(&self, message: &str, priority: Priority, source: Option<&str>) -> bool {
        let chars = message.chars().count();
        if chars > MAX_MESSAGE_CHARS && self.fallback_print {
            println!(
                "Warning: Message too long ({chars} chars), truncating to {MAX_MESSAGE_CHARS}"
            );
        }
        let message = truncate_message(message);

        match self.send_notification(message, priority, source).await {
            Ok(_) => true,
            Err(e) => {
                if let Some(line) = self.fallback_line(message) {
                    eprintln!("{FALLBACK_PREFIX} delivery failed: {e}");
                    println!("{line}");
                }
                false
            }
        }
    }

    /// Console line printed for an undelivered message, if printing is on.
    pub fn fallback_line(&self, message: &str) -> Option<String> {
        self.fallback_print
            .then(|| format!("{FALLBACK_PREFIX} {}", truncate_message(message)))
    }
}

/// The longest prefix of `message` within the character limit.
pub fn truncate_message(message: &str) -> &str {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}
