//! Test fixtures for common types.

use logtarget_core::{LogEvent, LogException, LogLevel};

/// Logger name used by the fixtures.
pub const TEST_LOGGER: &str = "app.checkout";

/// An `Info` event with `message` and no properties.
#[must_use]
pub fn test_event(message: &str) -> LogEvent {
    LogEvent::new(LogLevel::Info, TEST_LOGGER, message)
}

/// An `Info` event carrying the given properties.
#[must_use]
pub fn test_event_with_properties<'a>(
    message: &str,
    properties: impl IntoIterator<Item = (&'a str, serde_json::Value)>,
) -> LogEvent {
    properties
        .into_iter()
        .fold(test_event(message), |event, (key, value)| {
            event.with_property(key, value)
        })
}

/// A test exception.
#[must_use]
pub fn test_exception() -> LogException {
    LogException::new("PaymentDeclined", "card expired").with_cause("gateway returned 402")
}

/// An `Error` event carrying [`test_exception`].
#[must_use]
pub fn test_error_event(message: &str) -> LogEvent {
    LogEvent::new(LogLevel::Error, TEST_LOGGER, message).with_exception(test_exception())
}
