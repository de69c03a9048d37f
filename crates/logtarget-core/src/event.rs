//! Log events as delivered to targets.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::level::LogLevel;

/// Structured properties attached to an event, in insertion order.
pub type EventProperties = Map<String, Value>;

/// An error captured on a log event.
///
/// Holds the rendered pieces of an error rather than the error itself so
/// events stay `Clone` and `Send` regardless of what was logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogException {
    /// Fully qualified type name of the error.
    pub type_name: String,
    /// The error's display message.
    pub message: String,
    /// Messages of the `source()` chain, outermost first.
    #[serde(default)]
    pub causes: Vec<String>,
}

impl LogException {
    /// Create an exception from explicit parts.
    #[must_use]
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Capture an error, its type name and its source chain.
    ///
    /// The type name is the static type of `E`. Capture errors before they
    /// are boxed: a `dyn Error` only yields `dyn core::error::Error`, so
    /// every boxed error would share one name. Use
    /// [`with_type_name`](Self::with_type_name) when only the trait object
    /// is at hand.
    #[must_use]
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            type_name: std::any::type_name::<E>().to_owned(),
            message: error.to_string(),
            causes,
        }
    }

    /// Replace the recorded type name.
    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Add a cause message to the chain.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }
}

impl fmt::Display for LogException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)?;
        for cause in &self.causes {
            write!(f, " ---> {cause}")?;
        }
        Ok(())
    }
}

/// A single log event.
///
/// Targets receive events by reference and never mutate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Severity.
    pub level: LogLevel,
    /// Name of the logger that produced the event.
    pub logger_name: String,
    /// Formatted message.
    pub message: String,
    /// Attached error, if any.
    pub exception: Option<LogException>,
    /// Structured properties.
    #[serde(default)]
    pub properties: EventProperties,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Create an event.
    #[must_use]
    pub fn new(level: LogLevel, logger_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            logger_name: logger_name.into(),
            message: message.into(),
            exception: None,
            properties: Map::new(),
            timestamp: Utc::now(),
        }
    }

    /// The empty event used to render configuration-time layouts.
    #[must_use]
    pub fn null_event() -> Self {
        Self::new(LogLevel::Off, String::new(), String::new())
    }

    /// A null event at `Info` level carrying only a logger name.
    ///
    /// Used for header (`"Starting"`) and footer (`"Closing"`) output.
    #[must_use]
    pub fn lifecycle_event(logger_name: &str) -> Self {
        Self::null_event()
            .with_level(LogLevel::Info)
            .with_logger(logger_name)
    }

    /// Set the level.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the logger name.
    #[must_use]
    pub fn with_logger(mut self, logger_name: impl Into<String>) -> Self {
        self.logger_name = logger_name.into();
        self
    }

    /// Attach an exception.
    #[must_use]
    pub fn with_exception(mut self, exception: LogException) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Attach a structured property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Whether any structured properties are attached.
    #[must_use]
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk full")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("save failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_exception_from_error_captures_chain() {
        let exception = LogException::from_error(&Outer(Inner));
        assert!(exception.type_name.ends_with("Outer"));
        assert_eq!(exception.message, "save failed");
        assert_eq!(exception.causes, vec!["disk full"]);
        assert!(exception.to_string().ends_with("save failed ---> disk full"));
    }

    #[test]
    fn test_boxed_error_loses_concrete_type_name() {
        let boxed: Box<dyn std::error::Error> = Box::new(Outer(Inner));

        let exception = LogException::from_error(boxed.as_ref());
        assert!(exception.type_name.starts_with("dyn "));
        assert_eq!(exception.causes, vec!["disk full"]);

        let named = exception.with_type_name("SaveError");
        assert_eq!(named.type_name, "SaveError");
        assert_eq!(named.message, "save failed");
    }

    #[test]
    fn test_lifecycle_event() {
        let event = LogEvent::lifecycle_event("Starting");
        assert_eq!(event.level, LogLevel::Info);
        assert_eq!(event.logger_name, "Starting");
        assert!(event.message.is_empty());
        assert!(!event.has_properties());
    }

    #[test]
    fn test_properties_keep_insertion_order() {
        let event = LogEvent::new(LogLevel::Info, "app", "hi")
            .with_property("z", 1)
            .with_property("a", "two");
        let keys: Vec<&str> = event.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
