//! Client SDK for the agent-notify server.

pub mod client;

pub use client::{
    truncate_message, ClientError, HealthStatus, NotifyClient, NotifyResponse, Priority,
    DEFAULT_URL, MAX_MESSAGE_CHARS,
};
