//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges that would leave
//! the server unable to serve (zero window, zero quota, unbindable host).
//! Validation is a pure function that reports every problem, not just the
//! first one.

use thiserror::Error;

use crate::config::schema::NotifyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("speech.command must not be empty")]
    EmptySpeechCommand,

    #[error("speech.rate must be greater than zero")]
    ZeroSpeechRate,

    #[error("speech.timeout_secs must be greater than zero")]
    ZeroSpeechTimeout,

    #[error("rate_limit.max_requests must be greater than zero")]
    ZeroRateLimit,

    #[error("rate_limit.window_secs must be greater than zero")]
    ZeroWindow,

    #[error("rate_limit.sweep_interval_secs must be greater than zero")]
    ZeroSweepInterval,

    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration, returning all problems found.
pub fn validate_config(config: &NotifyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.speech.command.trim().is_empty() {
        errors.push(ValidationError::EmptySpeechCommand);
    }
    if config.speech.rate == 0 {
        errors.push(ValidationError::ZeroSpeechRate);
    }
    if config.speech.timeout_secs == 0 {
        errors.push(ValidationError::ZeroSpeechTimeout);
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroRateLimit);
    }
    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::ZeroWindow);
    }
    if config.rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::ZeroSweepInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
