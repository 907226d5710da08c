//! Structured logging.
//!
//! Events go to stdout and, when `log_to_file` is set, are appended to
//! `~/.agent-notify/logs/agent-notify.log` without ANSI colors. `RUST_LOG`
//! overrides the configured level.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::loader::{log_dir, ConfigError};
use crate::config::ObservabilityConfig;

pub const LOG_FILE_NAME: &str = "agent-notify.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level: {0}")]
    Filter(#[from] ParseError),

    #[error("cannot locate log directory: {0}")]
    Dir(#[from] ConfigError),

    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Level directive used when `RUST_LOG` is unset.
pub fn default_directive(config: &ObservabilityConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(config: &ObservabilityConfig, verbose: bool) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(config, verbose))?,
    };

    let file_layer = if config.log_to_file {
        let file = open_log_file(&log_dir()?)?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Open (creating if needed) the log file inside `dir` for appending.
pub fn open_log_file(dir: &Path) -> Result<File, std::io::Error> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
}
