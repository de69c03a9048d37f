//! Context property collection shared by targets.
//!
//! A target either forwards every structured property on an event, or a
//! fixed list of named layouts evaluated per event. [`TargetContext`]
//! holds both settings and answers which applies.

use serde::{Deserialize, Serialize};

use crate::event::{EventProperties, LogEvent};
use crate::layout::Layout;
use crate::level::LogLevel;
use crate::string_dictionary::StringDictionary;

/// A named value rendered from a layout for each event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextProperty {
    /// Property name. Entries with an empty name are skipped.
    pub name: String,
    /// Layout producing the value.
    pub layout: Layout,
    /// Keep the property even when it renders to an empty string.
    #[serde(default)]
    pub include_empty_value: bool,
}

impl ContextProperty {
    /// Create a context property.
    #[must_use]
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
            include_empty_value: false,
        }
    }

    /// Keep empty values.
    #[must_use]
    pub fn with_include_empty_value(mut self, include: bool) -> Self {
        self.include_empty_value = include;
        self
    }
}

/// Policy deciding whether an event's own properties are forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInclusion {
    /// Master switch.
    pub enabled: bool,
    /// Events below this level never forward their properties.
    #[serde(default)]
    pub min_level: LogLevel,
}

impl Default for PropertyInclusion {
    fn default() -> Self {
        Self {
            enabled: true,
            min_level: LogLevel::Trace,
        }
    }
}

impl PropertyInclusion {
    /// Inclusion switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_level: LogLevel::Trace,
        }
    }

    /// Whether `event` should forward its own properties.
    #[must_use]
    pub fn includes(&self, event: &LogEvent) -> bool {
        self.enabled && event.level >= self.min_level && event.has_properties()
    }
}

/// Property sources of a target, composed into it rather than inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetContext {
    /// Event property forwarding policy.
    #[serde(default)]
    pub include_event_properties: PropertyInclusion,
    /// Named layouts used when event properties are not forwarded.
    #[serde(default)]
    pub context_properties: Vec<ContextProperty>,
}

impl TargetContext {
    /// Create a context with the given policy and no named properties.
    #[must_use]
    pub fn new(include_event_properties: PropertyInclusion) -> Self {
        Self {
            include_event_properties,
            context_properties: Vec::new(),
        }
    }

    /// Add a named context property.
    #[must_use]
    pub fn with_context_property(mut self, property: ContextProperty) -> Self {
        self.context_properties.push(property);
        self
    }

    /// Whether the event's own properties should be forwarded.
    #[must_use]
    pub fn should_include_properties(&self, event: &LogEvent) -> bool {
        self.include_event_properties.includes(event)
    }

    /// String view over all structured properties of `event`.
    #[must_use]
    pub fn all_properties<'e>(&self, event: &'e LogEvent) -> StringDictionary<&'e EventProperties> {
        StringDictionary::new(&event.properties)
    }

    /// Render the named context properties for `event`.
    ///
    /// Unnamed entries are dropped, as are empty values unless the entry
    /// asks to keep them.
    #[must_use]
    pub fn render_context_properties(&self, event: &LogEvent) -> Vec<(String, String)> {
        self.context_properties
            .iter()
            .filter(|property| !property.name.is_empty())
            .filter_map(|property| {
                let value = property.layout.render(event);
                if value.is_empty() && !property.include_empty_value {
                    None
                } else {
                    Some((property.name.clone(), value))
                }
            })
            .collect()
    }
}
