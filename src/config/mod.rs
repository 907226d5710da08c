//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ~/.agent-notify/config.toml
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → NotifyConfig (validated, immutable)
//!     → shared via Arc to the server and dispatcher
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, save_config, ConfigError, ConfigSource};
pub use schema::{
    AuthConfig, ListenerConfig, NotifyConfig, ObservabilityConfig, RateLimitConfig,
    SpeechConfig, VisualConfig,
};
pub use validation::{validate_config, ValidationError};
