//! The `Target` trait and the registry of target factories.

use std::collections::HashMap;
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::event::LogEvent;

/// An output sink for log events.
///
/// Targets are initialized once, receive events on whatever thread logs
/// them, and are closed once at shutdown.
pub trait Target: Send + Sync {
    /// Name of this target instance, used by routing rules.
    fn name(&self) -> &str;

    /// Prepare the target for writing.
    ///
    /// # Errors
    ///
    /// A failure here means the target cannot operate at all.
    fn initialize(&mut self) -> CoreResult<()> {
        Ok(())
    }

    /// Write one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered.
    fn write(&self, event: &LogEvent) -> CoreResult<()>;

    /// Flush trailing output and release resources.
    fn close(&mut self) {}
}

/// Builds a target from its name and configuration table.
pub type TargetFactory =
    Box<dyn Fn(&str, toml::Table) -> CoreResult<Box<dyn Target>> + Send + Sync>;

/// Registry of target types available to configuration files.
///
/// Type names are matched case-insensitively.
#[derive(Default)]
pub struct TargetRegistry {
    factories: HashMap<String, TargetFactory>,
}

impl fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.factories.keys().collect();
        types.sort();
        f.debug_struct("TargetRegistry")
            .field("types", &types)
            .finish()
    }
}

impl TargetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `type_name`, replacing any previous one.
    pub fn register<F>(&mut self, type_name: &str, factory: F)
    where
        F: Fn(&str, toml::Table) -> CoreResult<Box<dyn Target>> + Send + Sync + 'static,
    {
        tracing::debug!(target_type = type_name, "Registered target type");
        self.factories
            .insert(type_name.to_ascii_lowercase(), Box::new(factory));
    }

    /// Whether `type_name` is registered.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(&type_name.to_ascii_lowercase())
    }

    /// Build a target of `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownTargetType`] if no factory is registered,
    /// or whatever the factory returns.
    pub fn create(
        &self,
        type_name: &str,
        name: &str,
        options: toml::Table,
    ) -> CoreResult<Box<dyn Target>> {
        let factory = self
            .factories
            .get(&type_name.to_ascii_lowercase())
            .ok_or_else(|| CoreError::UnknownTargetType(type_name.to_owned()))?;
        factory(name, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(String);

    impl Target for Named {
        fn name(&self) -> &str {
            &self.0
        }

        fn write(&self, _event: &LogEvent) -> CoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_is_case_insensitive() {
        let mut registry = TargetRegistry::new();
        registry.register("Memory", |name, _| Ok(Box::new(Named(name.to_owned()))));

        assert!(registry.contains("memory"));
        let target = registry.create("MEMORY", "mem", toml::Table::new()).unwrap();
        assert_eq!(target.name(), "mem");
    }

    #[test]
    fn test_unknown_type() {
        let registry = TargetRegistry::new();
        assert!(matches!(
            registry.create("nope", "x", toml::Table::new()),
            Err(CoreError::UnknownTargetType(t)) if t == "nope"
        ));
    }
}
