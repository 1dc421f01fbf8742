use log::LevelFilter;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable holding the log level name.
pub const LOG_LEVEL_VAR: &str = "LOGLEVEL";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown log level '{0}' (expected one of CRITICAL, ERROR, WARNING, INFO, DEBUG, NOTSET)")]
pub struct LogLevelError(String);

/// Verbosity chosen at startup. Defaults to `INFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(LevelFilter);

impl Default for LogLevel {
    fn default() -> Self {
        Self(LevelFilter::Info)
    }
}

impl FromStr for LogLevel {
    type Err = LogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = match s.trim().to_ascii_uppercase().as_str() {
            "OFF" => LevelFilter::Off,
            "CRITICAL" | "FATAL" | "ERROR" => LevelFilter::Error,
            "WARNING" | "WARN" => LevelFilter::Warn,
            "INFO" => LevelFilter::Info,
            "DEBUG" => LevelFilter::Debug,
            "NOTSET" | "TRACE" => LevelFilter::Trace,
            _ => return Err(LogLevelError(s.to_string())),
        };
        Ok(Self(filter))
    }
}

impl LogLevel {
    /// Resolve the level from the raw value of [`LOG_LEVEL_VAR`], if set.
    pub fn from_var(value: Option<&str>) -> Result<Self, LogLevelError> {
        match value {
            Some(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::default()),
        }
    }

    pub fn filter(self) -> LevelFilter {
        self.0
    }
}

/// Install the global logger. Must be called once, before anything logs.
pub fn init(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.filter())
        .format_timestamp(None)
        .format_target(false)
        .init();
}
