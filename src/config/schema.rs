//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! notification server. All types derive Serde traits for (de)serialization
//! from the TOML config file, and every field has a default so a missing or
//! partial file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the notification server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct NotifyConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Speech synthesis settings for the audio channel.
    pub speech: SpeechConfig,

    /// Desktop popup settings for the visual channel.
    pub visual: VisualConfig,

    /// Per-client rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Bearer token authentication.
    pub auth: AuthConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl NotifyConfig {
    /// The `host:port` pair the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.host, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host. Loopback by default; the service is meant to be local.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8765,
            max_body_bytes: 16 * 1024,
        }
    }
}

/// Speech synthesis configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    /// Voice name. Empty string lets the synthesizer pick the system default.
    pub voice: String,

    /// Speech rate in words per minute.
    pub rate: u32,

    /// Program invoked to speak (receives `-v`, `-r` and the message).
    pub command: String,

    /// Deadline for one utterance in seconds.
    pub timeout_secs: u64,
}

impl SpeechConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice: String::new(),
            rate: 180,
            command: "say".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Desktop popup configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct VisualConfig {
    /// Show a desktop popup after speaking.
    pub enabled: bool,

    /// Base popup title.
    pub title: String,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Agent Notify".to_string(),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum requests per client within one window.
    pub max_requests: u32,

    /// Sliding window length in seconds.
    pub window_secs: u64,

    /// How often idle client entries are evicted, in seconds.
    pub sweep_interval_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
            sweep_interval_secs: 60,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret expected as `Authorization: Bearer <token>`.
    /// `None` (or empty) disables authentication.
    pub token: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Also write logs to `~/.agent-notify/logs/agent-notify.log`.
    pub log_to_file: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9465".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NotifyConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8765");
        assert_eq!(config.speech.voice, "");
        assert_eq!(config.speech.rate, 180);
        assert!(config.visual.enabled);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(60));
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: NotifyConfig = toml::from_str(
            r#"
            [speech]
            voice = "Samantha"

            [auth]
            token = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.speech.voice, "Samantha");
        assert_eq!(config.speech.rate, 180);
        assert_eq!(config.auth.token.as_deref(), Some("secret"));
        assert_eq!(config.listener.port, 8765);
    }
}
