//! Notification subsystem.
//!
//! # Data Flow
//! ```text
//! NotifyPayload (wire JSON)
//!     → types.rs (validate into NotificationRequest)
//!     → dispatcher.rs
//!         → channels/audio.rs  (speech, mandatory)
//!         → channels/visual.rs (popup, best-effort)
//! ```
//!
//! # Design Decisions
//! - A request is validated once, at construction, and trusted afterwards
//! - Channel backends sit behind traits so tests can count calls
//! - The visual channel reports an outcome value, not an error

pub mod channels;
pub mod dispatcher;
pub mod types;

pub use dispatcher::{DispatchError, DispatchReport, NotificationDispatcher};
pub use types::{
    HealthResponse, NotificationRequest, NotificationResponse, NotifyPayload, Priority,
    ValidationError, MAX_MESSAGE_CHARS,
};
