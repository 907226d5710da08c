//! Configuration loading from and saving to disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::NotifyConfig;
use crate::config::validation::{validate_config, ValidationError};

const CONFIG_DIR_NAME: &str = ".agent-notify";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration loading and saving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("No home directory available")]
    NoHomeDir,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `~/.agent-notify`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// `~/.agent-notify/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// `~/.agent-notify/logs`
pub fn log_dir() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("logs"))
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<NotifyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: NotifyConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Where the active configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    Missing(PathBuf),
    /// The file exists but could not be used.
    Invalid(PathBuf, ConfigError),
    /// No path could be resolved at all.
    Unresolved(ConfigError),
}

impl ConfigSource {
    /// Report the source. Call after logging is initialized.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                tracing::info!(path = %path.display(), "Configuration loaded")
            }
            ConfigSource::Missing(path) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults")
            }
            ConfigSource::Invalid(path, e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to load config, using defaults"
            ),
            ConfigSource::Unresolved(e) => {
                tracing::warn!(error = %e, "Cannot resolve config path, using defaults")
            }
        }
    }
}

/// Load configuration from `path`, or the default location when `None`.
///
/// A missing file yields the defaults. A file that fails to read, parse or
/// validate also falls back to the defaults, so the service still starts
/// with a known-good configuration.
pub fn load_or_default(path: Option<&Path>) -> (NotifyConfig, ConfigSource) {
    let resolved = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Ok(p) => p,
            Err(e) => return (NotifyConfig::default(), ConfigSource::Unresolved(e)),
        },
    };

    if !resolved.exists() {
        return (NotifyConfig::default(), ConfigSource::Missing(resolved));
    }

    match load_config(&resolved) {
        Ok(config) => (config, ConfigSource::File(resolved)),
        Err(e) => (NotifyConfig::default(), ConfigSource::Invalid(resolved, e)),
    }
}

/// Write configuration as TOML, creating parent directories as needed.
pub fn save_config(config: &NotifyConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = NotifyConfig::default();
        config.speech.voice = "Daniel".to_string();
        config.rate_limit.max_requests = 3;
        config.auth.token = Some("hunter2".to_string());

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[rate_limit]\nmax_requests = 0\n").unwrap();

        match load_config(&path) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec![ValidationError::ZeroRateLimit]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        let (config, source) = load_or_default(Some(missing.as_path()));
        assert_eq!(config, NotifyConfig::default());
        assert!(matches!(source, ConfigSource::Missing(_)));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "this is = = not toml").unwrap();
        let (config, source) = load_or_default(Some(broken.as_path()));
        assert_eq!(config, NotifyConfig::default());
        assert!(matches!(source, ConfigSource::Invalid(_, ConfigError::Parse(_))));

        let good = dir.path().join("good.toml");
        fs::write(&good, "[listener]\nport = 9000\n").unwrap();
        let (config, source) = load_or_default(Some(good.as_path()));
        assert_eq!(config.listener.port, 9000);
        assert!(matches!(source, ConfigSource::File(_)));
    }
}
