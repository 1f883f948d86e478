//! Logging configuration read from the process environment.
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `LOG_LEVEL` | `DEBUG`, `INFO`, `WARN` / `WARNING`, `ERROR` (any case) | `INFO` |
//! | `LOG_FORMAT` | `json`, `compact` (any case) | `json` |
//!
//! Unrecognised values fall back to the default.

use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

use crate::LoggingError;

/// Minimum severity that is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Reads a level from an environment value, defaulting to [`LogLevel::Info`].
    pub fn from_env_value(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// Converts to the filter applied by the subscriber.
    pub const fn as_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            _ => Err(LoggingError::InvalidLevel(s.to_owned())),
        }
    }
}

/// Output line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogFormat {
    /// One JSON object per line (default).
    #[default]
    Json,
    /// Compact human-readable single-line format, for local runs.
    Compact,
}

impl LogFormat {
    /// Reads a format from an environment value, defaulting to [`LogFormat::Json`].
    pub fn from_env_value(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(LoggingError::InvalidFormat(s.to_owned())),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum level written.
    pub level: LogLevel,
    /// Line format.
    pub format: LogFormat,
}

impl LogConfig {
    /// Environment variable holding the level.
    pub const LEVEL_VAR: &'static str = "LOG_LEVEL";
    /// Environment variable holding the format.
    pub const FORMAT_VAR: &'static str = "LOG_FORMAT";

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            level: LogLevel::from_env_value(lookup(Self::LEVEL_VAR).as_deref()),
            format: LogFormat::from_env_value(lookup(Self::FORMAT_VAR).as_deref()),
        }
    }

    /// Overrides the level, ignoring the environment.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Overrides the format, ignoring the environment.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}
