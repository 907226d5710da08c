//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, body limit, request ID, trace span)
//!     → handlers.rs (validate → authenticate → rate-limit → dispatch)
//!     → error.rs (failure → status code + JSON body)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
