//! Core runtime configuration.
//!
//! # Responsibility
//! - Collect logging and scratch-file settings in one validated value.
//! - Read overrides from `JOT_*` environment variables.
//!
//! # Invariants
//! - A constructed `CoreConfig` is always valid; validation happens on load.
//! - Configured directories are absolute.

use crate::logging::{self, LoggingError};
use crate::model::{SystemTempFiles, DEFAULT_TEMP_PREFIX};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_LOG_LEVEL: &str = "JOT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "JOT_LOG_DIR";
pub const ENV_TMPDIR: &str = "JOT_TMPDIR";
pub const ENV_TMP_PREFIX: &str = "JOT_TMP_PREFIX";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a level name, case-insensitively. `warning` is accepted.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::UnsupportedLogLevel(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel(String),
    RelativePath { key: &'static str, value: String },
    InvalidTempPrefix(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativePath { key, value } => {
                write!(f, "{key} must be an absolute path, got `{value}`")
            }
            Self::InvalidTempPrefix(value) => write!(
                f,
                "temp file prefix must be non-empty and contain no path separators, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings for the core crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: LogLevel,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    /// Falls back to the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    pub temp_prefix: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: logging::default_log_level(),
            log_dir: None,
            temp_dir: None,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

impl CoreConfig {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through `lookup`, starting from defaults.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = LogLevel::parse(&level)?;
        }
        config.log_dir = read(ENV_LOG_DIR)
            .map(|value| absolute_dir(ENV_LOG_DIR, value))
            .transpose()?;
        config.temp_dir = read(ENV_TMPDIR)
            .map(|value| absolute_dir(ENV_TMPDIR, value))
            .transpose()?;
        if let Some(prefix) = read(ENV_TMP_PREFIX) {
            config.temp_prefix = validate_prefix(prefix)?;
        }
        Ok(config)
    }

    /// Temp-file provider for `Document::mutate_with`.
    pub fn temp_files(&self) -> SystemTempFiles {
        let provider = SystemTempFiles::new(self.temp_prefix.clone());
        match &self.temp_dir {
            Some(dir) => provider.in_dir(dir),
            None => provider,
        }
    }

    /// Starts file logging when `log_dir` is set.
    ///
    /// Returns `Ok(false)` when file logging is disabled.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.log_dir {
            Some(dir) => logging::init_logging(self.log_level, dir).map(|()| true),
            None => Ok(false),
        }
    }
}

fn absolute_dir(key: &'static str, value: String) -> Result<PathBuf, ConfigError> {
    if Path::new(&value).is_absolute() {
        Ok(PathBuf::from(value))
    } else {
        Err(ConfigError::RelativePath { key, value })
    }
}

fn validate_prefix(prefix: String) -> Result<String, ConfigError> {
    if prefix.contains(['/', '\\']) {
        return Err(ConfigError::InvalidTempPrefix(prefix));
    }
    Ok(prefix)
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, LogLevel, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_TMP_PREFIX};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| values.get(key).cloned()
    }

    #[test]
    fn log_level_parse_accepts_known_values() {
        assert_eq!(LogLevel::parse("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::parse(" warning ").unwrap(), LogLevel::Warn);
        assert_eq!(
            LogLevel::parse("verbose").unwrap_err(),
            ConfigError::UnsupportedLogLevel("verbose".to_string())
        );
    }

    #[test]
    fn from_lookup_uses_defaults_for_missing_and_blank_values() {
        let config = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_DIR, "  ")])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.temp_prefix, "jot_");
    }

    #[test]
    fn from_lookup_rejects_relative_dirs_and_bad_prefix() {
        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_DIR, "logs/dev")])).unwrap_err();
        assert!(err.to_string().contains("absolute"), "{err}");

        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_TMP_PREFIX, "a/b")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTempPrefix(_)));
    }

    #[test]
    fn temp_files_reflects_configured_dir_and_prefix() {
        let dir = std::env::temp_dir();
        let config = CoreConfig {
            temp_dir: Some(dir.clone()),
            temp_prefix: "edit_".to_string(),
            ..CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "error")])).unwrap()
        };
        assert_eq!(config.log_level, LogLevel::Error);

        let provider = config.temp_files();
        assert_eq!(provider.dir(), Some(dir.as_path()));
        assert_eq!(provider.prefix(), "edit_");
    }

    #[test]
    fn init_logging_is_skipped_without_log_dir() {
        assert!(!CoreConfig::default().init_logging().unwrap());
    }
}
