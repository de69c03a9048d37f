//! Log severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Severity of a log event, ordered from least to most severe.
///
/// `Off` is only meaningful as a rule threshold; no event is written at it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    /// Very detailed tracing.
    #[default]
    Trace,
    /// Debugging information.
    Debug,
    /// Informational messages.
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
    /// Fatal errors.
    Fatal,
    /// Disables logging.
    Off,
}

impl LogLevel {
    /// All levels an event can be written at, in ascending order.
    pub const ALL: [Self; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Numeric ordinal (`Trace` = 0 ... `Off` = 6).
    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Trace => 0,
            Self::Debug => 1,
            Self::Info => 2,
            Self::Warn => 3,
            Self::Error => 4,
            Self::Fatal => 5,
            Self::Off => 6,
        }
    }

    /// Level name as rendered by `${level}`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "Trace",
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Warn => "Warn",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
            Self::Off => "Off",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "off" => Ok(Self::Off),
            other => Err(CoreError::Config(format!("unknown log level '{other}'"))),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, CoreError> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert!(LogLevel::Fatal < LogLevel::Off);
        assert_eq!(LogLevel::Warn.ordinal(), 3);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_try_from_string() {
        assert_eq!(LogLevel::try_from("Error".to_owned()).unwrap(), LogLevel::Error);
        assert!(matches!(
            LogLevel::try_from("loud".to_owned()),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&LogLevel::Error).unwrap();
        assert_eq!(json, "\"Error\"");
        let parsed: LogLevel = serde_json::from_str("\"fatal\"").unwrap();
        assert_eq!(parsed, LogLevel::Fatal);
    }
}
