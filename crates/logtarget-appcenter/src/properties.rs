//! Telemetry property maps handed to the SDK.

use logtarget_core::{LogEvent, StringDictionary, TargetContext};

/// Maximum number of properties the backend keeps per event.
pub const MAX_PROPERTY_COUNT: usize = 20;

/// Maximum property key length accepted by the backend.
pub const MAX_PROPERTY_KEY_LENGTH: usize = 125;

/// Maximum property value length accepted by the backend.
pub const MAX_PROPERTY_VALUE_LENGTH: usize = 125;

/// Maximum event name length accepted by the backend.
pub const MAX_EVENT_NAME_LENGTH: usize = 256;

/// Ordered string properties of one telemetry call.
///
/// Keys are compared ASCII-case-insensitively when inserting. Count and
/// length limits are enforced by the SDK, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryProperties {
    entries: Vec<(String, String)>,
}

impl TelemetryProperties {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every entry of a string view.
    ///
    /// Keys coming from an event map are already unique, so no merging
    /// happens here.
    #[must_use]
    pub fn from_dictionary<M>(dictionary: &StringDictionary<M>) -> Self
    where
        M: std::ops::Deref<Target = logtarget_core::EventProperties>,
    {
        Self {
            entries: dictionary
                .iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect(),
        }
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert only while the map holds fewer than [`MAX_PROPERTY_COUNT`]
    /// entries. Returns whether the value was stored.
    pub fn insert_within_capacity(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        if self.entries.len() >= MAX_PROPERTY_COUNT {
            return false;
        }
        self.insert(key, value);
        true
    }

    /// Look up a value by key, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for TelemetryProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

/// Build the properties for `event`.
///
/// Event properties win when the inclusion policy accepts the event;
/// otherwise the named context properties are rendered. Returns `None`
/// when the chosen source yields nothing.
#[must_use]
pub fn build_properties(context: &TargetContext, event: &LogEvent) -> Option<TelemetryProperties> {
    let properties = if context.should_include_properties(event) {
        TelemetryProperties::from_dictionary(&context.all_properties(event))
    } else if context.context_properties.is_empty() {
        return None;
    } else {
        context.render_context_properties(event).into_iter().collect()
    };

    (!properties.is_empty()).then_some(properties)
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use logtarget_core::{ContextProperty, Layout, LogLevel, PropertyInclusion};
    use serde_json::Value;

    use super::*;

    fn context_with(properties: &[(&str, &str, bool)]) -> TargetContext {
        let mut context = TargetContext::new(PropertyInclusion::disabled());
        for (name, layout, keep) in properties {
            context = context.with_context_property(
                ContextProperty::new(*name, Layout::parse(layout).unwrap())
                    .with_include_empty_value(*keep),
            );
        }
        context
    }

    #[test]
    fn test_insert_replaces_case_insensitively() {
        let mut properties = TelemetryProperties::new();
        properties.insert("Env", "dev");
        properties.insert("env", "prod");
        assert_eq!(properties.len(), 1);
        assert_eq!(properties.get("ENV"), Some("prod"));
    }

    #[test]
    fn test_insert_within_capacity() {
        let mut properties: TelemetryProperties = (0..MAX_PROPERTY_COUNT)
            .map(|i| (format!("k{i}"), "v"))
            .collect();
        assert!(!properties.insert_within_capacity("EventName", "x"));
        assert_eq!(properties.len(), MAX_PROPERTY_COUNT);
        assert_eq!(properties.get("EventName"), None);

        let mut small: TelemetryProperties = [("a", "1")].into_iter().collect();
        assert!(small.insert_within_capacity("EventName", "x"));
        assert_eq!(small.get("EventName"), Some("x"));
    }

    #[test]
    fn test_length_limits_are_left_to_the_sdk() {
        let key = "k".repeat(MAX_PROPERTY_KEY_LENGTH + 1);
        let value = "v".repeat(MAX_PROPERTY_VALUE_LENGTH + 1);
        let event =
            LogEvent::new(LogLevel::Info, "app", "msg").with_property(key.clone(), value.clone());

        let properties = build_properties(&TargetContext::default(), &event).unwrap();
        assert_eq!(properties.get(&key), Some(value.as_str()));
    }

    #[test]
    fn test_event_properties_are_harvested() {
        let context = TargetContext::default();
        let event = LogEvent::new(LogLevel::Info, "app", "msg")
            .with_property("user", "ann")
            .with_property("count", 2)
            .with_property("missing", Value::Null);

        let properties = build_properties(&context, &event).unwrap();
        assert_eq!(
            properties.iter().collect::<Vec<_>>(),
            vec![("user", "ann"), ("count", "2"), ("missing", "")]
        );
    }

    #[test]
    fn test_event_properties_win_over_context_properties() {
        let context = TargetContext::default()
            .with_context_property(ContextProperty::new("env", Layout::literal("prod")));
        let event = LogEvent::new(LogLevel::Info, "app", "msg").with_property("user", "ann");

        let properties = build_properties(&context, &event).unwrap();
        assert_eq!(properties.get("user"), Some("ann"));
        assert_eq!(properties.get("env"), None);
    }

    #[test]
    fn test_context_properties_drop_empty_values() {
        let context = context_with(&[("env", "prod", false), ("empty", "", false)]);
        let event = LogEvent::new(LogLevel::Info, "app", "msg");

        let properties = build_properties(&context, &event).unwrap();
        assert_eq!(properties.iter().collect::<Vec<_>>(), vec![("env", "prod")]);
    }

    #[test]
    fn test_context_properties_keep_requested_empty_values() {
        let context = context_with(&[("env", "prod", false), ("empty", "", true)]);
        let event = LogEvent::new(LogLevel::Info, "app", "msg");

        let properties = build_properties(&context, &event).unwrap();
        assert_eq!(
            properties.iter().collect::<Vec<_>>(),
            vec![("env", "prod"), ("empty", "")]
        );
    }

    #[test]
    fn test_no_source_yields_none() {
        let event = LogEvent::new(LogLevel::Info, "app", "msg");
        assert_eq!(build_properties(&TargetContext::default(), &event), None);
        assert_eq!(build_properties(&context_with(&[("e", "", false)]), &event), None);
    }

    #[test]
    fn test_event_without_properties_falls_back_to_context_properties() {
        let context = TargetContext::default()
            .with_context_property(ContextProperty::new("logger", Layout::parse("${logger}").unwrap()));
        let event = LogEvent::new(LogLevel::Info, "app.db", "msg");

        let properties = build_properties(&context, &event).unwrap();
        assert_eq!(properties.get("logger"), Some("app.db"));
    }
}
