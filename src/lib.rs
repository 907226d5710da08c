//! Agent Notify library.
//!
//! A local HTTP service that turns short status messages from automated
//! agents into spoken audio and an optional desktop popup.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod notification;
pub mod observability;
pub mod security;

pub use config::schema::NotifyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use notification::{NotificationDispatcher, NotificationRequest, Priority};
