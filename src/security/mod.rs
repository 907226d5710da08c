//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Validated request:
//!     → auth.rs (bearer token, if configured)
//!     → rate_limit.rs (per-IP sliding window)
//!     → Pass to dispatcher
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any check failure
//! - Authentication runs before rate limiting, so unauthenticated callers
//!   never consume quota

pub mod auth;
pub mod rate_limit;

pub use auth::{bearer_credential, Authenticator};
pub use rate_limit::RateLimiter;
