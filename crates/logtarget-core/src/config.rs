//! Logging configuration: targets, routing rules and the dispatching factory.
//!
//! Configuration can be assembled in code through [`SetupBuilder`] or
//! loaded from TOML:
//!
//! ```toml
//! [[targets]]
//! type = "AppCenter"
//! name = "appcenter"
//! app_secret = "00000000-0000-0000-0000-000000000000"
//!
//! [[rules]]
//! logger = "*"
//! min_level = "Info"
//! write_to = ["appcenter"]
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::event::LogEvent;
use crate::level::LogLevel;
use crate::target::{Target, TargetRegistry};

/// Routes events from matching loggers to named targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingRule {
    /// Logger name pattern. `*` matches any run of characters.
    #[serde(default = "default_logger_pattern")]
    pub logger: String,
    /// Minimum level an event needs to match.
    #[serde(default)]
    pub min_level: LogLevel,
    /// Names of the targets to write to.
    pub write_to: Vec<String>,
}

fn default_logger_pattern() -> String {
    "*".to_owned()
}

impl LoggingRule {
    /// A rule sending everything at or above `min_level` to `target`.
    #[must_use]
    pub fn catch_all(min_level: LogLevel, target: impl Into<String>) -> Self {
        Self {
            logger: default_logger_pattern(),
            min_level,
            write_to: vec![target.into()],
        }
    }

    /// Whether `event` is routed by this rule.
    #[must_use]
    pub fn matches(&self, event: &LogEvent) -> bool {
        self.min_level != LogLevel::Off
            && event.level != LogLevel::Off
            && event.level >= self.min_level
            && logger_matches(&self.logger, &event.logger_name)
    }
}

/// Glob match supporting `*` wildcards anywhere in the pattern.
fn logger_matches(pattern: &str, name: &str) -> bool {
    let mut pieces = pattern.split('*');
    let Some(first) = pieces.next() else {
        return name.is_empty();
    };
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let pieces: Vec<&str> = pieces.collect();
    let Some((last, middle)) = pieces.split_last() else {
        // No wildcard at all: exact match.
        return rest.is_empty();
    };

    for piece in middle {
        match rest.find(piece) {
            Some(index) => rest = &rest[index.saturating_add(piece.len())..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    targets: Vec<toml::Table>,
    #[serde(default)]
    rules: Vec<LoggingRule>,
}

/// Targets plus the rules routing events to them.
#[derive(Default)]
pub struct LoggingConfiguration {
    targets: Vec<Box<dyn Target>>,
    rules: Vec<LoggingRule>,
}

impl std::fmt::Debug for LoggingConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.targets.iter().map(|t| t.name()).collect();
        f.debug_struct("LoggingConfiguration")
            .field("targets", &names)
            .field("rules", &self.rules)
            .finish()
    }
}

impl LoggingConfiguration {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from TOML, building targets through `registry`.
    ///
    /// Every `[[targets]]` table needs a `type` and a `name`; the remaining
    /// keys are handed to the target factory.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, unknown target types, duplicate
    /// target names, or rules referring to undefined targets.
    pub fn load_from_toml(text: &str, registry: &TargetRegistry) -> CoreResult<Self> {
        let file: FileConfig = toml::from_str(text)?;
        let mut config = Self::new();

        for mut table in file.targets {
            let type_name = take_string(&mut table, "type")?;
            let name = take_string(&mut table, "name")?;
            let target = registry.create(&type_name, &name, table)?;
            config.add_target(target)?;
        }
        for rule in file.rules {
            config.add_rule(rule)?;
        }

        debug!(
            targets = config.targets.len(),
            rules = config.rules.len(),
            "Loaded logging configuration"
        );
        Ok(config)
    }

    /// Add a target.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if a target with the same name exists.
    pub fn add_target(&mut self, target: Box<dyn Target>) -> CoreResult<()> {
        if self.find_target(target.name()).is_some() {
            return Err(CoreError::Config(format!(
                "duplicate target name '{}'",
                target.name()
            )));
        }
        self.targets.push(target);
        Ok(())
    }

    /// Add a routing rule.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the rule names an unknown target.
    pub fn add_rule(&mut self, rule: LoggingRule) -> CoreResult<()> {
        if let Some(missing) = rule
            .write_to
            .iter()
            .find(|name| self.find_target(name).is_none())
        {
            return Err(CoreError::Config(format!(
                "rule for '{}' writes to undefined target '{missing}'",
                rule.logger
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Names of all configured targets.
    #[must_use]
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name()).collect()
    }

    /// The configured rules.
    #[must_use]
    pub fn rules(&self) -> &[LoggingRule] {
        &self.rules
    }

    fn find_target(&self, name: &str) -> Option<usize> {
        self.targets.iter().position(|t| t.name() == name)
    }
}

fn take_string(table: &mut toml::Table, key: &str) -> CoreResult<String> {
    match table.remove(key) {
        Some(toml::Value::String(value)) if !value.is_empty() => Ok(value),
        Some(_) => Err(CoreError::Config(format!(
            "target '{key}' must be a non-empty string"
        ))),
        None => Err(CoreError::Config(format!("target is missing '{key}'"))),
    }
}

/// Fluent construction of a [`LogFactory`].
#[derive(Debug, Default)]
pub struct SetupBuilder {
    config: LoggingConfiguration,
    errors: Vec<CoreError>,
}

impl SetupBuilder {
    /// Start from an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration.
    #[must_use]
    pub fn from_configuration(config: LoggingConfiguration) -> Self {
        Self {
            config,
            errors: Vec::new(),
        }
    }

    /// Write every event to `target`.
    #[must_use]
    pub fn write_to(self, target: impl Target + 'static) -> Self {
        self.write_to_with_level(target, LogLevel::Trace)
    }

    /// Write events at or above `min_level` to `target`.
    #[must_use]
    pub fn write_to_with_level(mut self, target: impl Target + 'static, min_level: LogLevel) -> Self {
        let rule = LoggingRule::catch_all(min_level, target.name());
        let result = self
            .config
            .add_target(Box::new(target))
            .and_then(|()| self.config.add_rule(rule));
        if let Err(e) = result {
            self.errors.push(e);
        }
        self
    }

    /// Add a routing rule for already configured targets.
    #[must_use]
    pub fn with_rule(mut self, rule: LoggingRule) -> Self {
        if let Err(e) = self.config.add_rule(rule) {
            self.errors.push(e);
        }
        self
    }

    /// Initialize all targets and produce the factory.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while building, or the first target
    /// initialization failure.
    pub fn build(self) -> CoreResult<LogFactory> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        LogFactory::initialize(self.config)
    }
}

/// Dispatches events to targets according to the rules.
#[derive(Debug)]
pub struct LogFactory {
    config: LoggingConfiguration,
    closed: bool,
}

impl LogFactory {
    /// Initialize every target of `config`.
    ///
    /// # Errors
    ///
    /// Returns the first initialization failure. Targets initialized
    /// before it are closed again.
    pub fn initialize(mut config: LoggingConfiguration) -> CoreResult<Self> {
        for index in 0..config.targets.len() {
            if let Err(error) = config.targets[index].initialize() {
                tracing::error!(
                    target_name = config.targets[index].name(),
                    error = %error,
                    "Failed to initialize target"
                );
                for initialized in config.targets.iter_mut().take(index) {
                    initialized.close();
                }
                return Err(error);
            }
        }
        info!(targets = config.targets.len(), "Logging configuration initialized");
        Ok(Self {
            config,
            closed: false,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn configuration(&self) -> &LoggingConfiguration {
        &self.config
    }

    /// Deliver `event` to every target routed by a matching rule.
    ///
    /// Each target receives an event at most once. Write failures are
    /// reported to the diagnostic log and never returned.
    pub fn log(&self, event: &LogEvent) {
        if self.closed {
            return;
        }
        let mut written: Vec<usize> = Vec::new();
        for rule in self.config.rules.iter().filter(|r| r.matches(event)) {
            for name in &rule.write_to {
                let Some(index) = self.config.find_target(name) else {
                    continue;
                };
                if written.contains(&index) {
                    continue;
                }
                written.push(index);
                if let Err(error) = self.config.targets[index].write(event) {
                    warn!(target_name = %name, error = %error, "Target failed to write event");
                }
            }
        }
    }

    /// Close every target. Further events are dropped.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        for target in &mut self.config.targets {
            target.close();
        }
        self.closed = true;
        debug!("Logging configuration closed");
    }
}

impl Drop for LogFactory {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Recorded(Arc<Mutex<Vec<String>>>);

    impl Recorded {
        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct MemoryTarget {
        name: String,
        log: Recorded,
        fail_init: bool,
    }

    impl MemoryTarget {
        fn new(name: &str, log: &Recorded) -> Self {
            Self {
                name: name.to_owned(),
                log: log.clone(),
                fail_init: false,
            }
        }
    }

    impl Target for MemoryTarget {
        fn name(&self) -> &str {
            &self.name
        }

        fn initialize(&mut self) -> CoreResult<()> {
            if self.fail_init {
                return Err(CoreError::Config("boom".into()));
            }
            self.log.0.lock().unwrap().push(format!("{}:init", self.name));
            Ok(())
        }

        fn write(&self, event: &LogEvent) -> CoreResult<()> {
            self.log
                .0
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, event.message));
            Ok(())
        }

        fn close(&mut self) {
            self.log.0.lock().unwrap().push(format!("{}:close", self.name));
        }
    }

    #[test]
    fn test_logger_matches() {
        assert!(logger_matches("*", "anything"));
        assert!(logger_matches("app.*", "app.net"));
        assert!(!logger_matches("app.*", "other.net"));
        assert!(logger_matches("*.net", "app.net"));
        assert!(logger_matches("app*client", "app.net.client"));
        assert!(logger_matches("exact", "exact"));
        assert!(!logger_matches("exact", "exactly"));
    }

    #[test]
    fn test_rules_route_by_level_and_logger() {
        let log = Recorded::default();
        let mut factory = SetupBuilder::new()
            .write_to_with_level(MemoryTarget::new("warn", &log), LogLevel::Warn)
            .write_to(MemoryTarget::new("all", &log))
            .build()
            .unwrap();

        factory.log(&LogEvent::new(LogLevel::Info, "app", "hello"));
        factory.log(&LogEvent::new(LogLevel::Error, "app", "bad"));
        factory.shutdown();
        factory.log(&LogEvent::new(LogLevel::Error, "app", "dropped"));

        assert_eq!(
            log.entries(),
            vec![
                "warn:init",
                "all:init",
                "all:hello",
                "warn:bad",
                "all:bad",
                "warn:close",
                "all:close",
            ]
        );
    }

    #[test]
    fn test_target_written_once_per_event() {
        let log = Recorded::default();
        let factory = SetupBuilder::new()
            .write_to(MemoryTarget::new("mem", &log))
            .with_rule(LoggingRule::catch_all(LogLevel::Trace, "mem"))
            .build()
            .unwrap();
        factory.log(&LogEvent::new(LogLevel::Info, "app", "once"));
        assert_eq!(log.entries(), vec!["mem:init", "mem:once"]);
    }

    #[test]
    fn test_build_reports_configuration_errors() {
        let log = Recorded::default();
        let result = SetupBuilder::new()
            .write_to(MemoryTarget::new("dup", &log))
            .write_to(MemoryTarget::new("dup", &log))
            .build();
        assert!(matches!(result, Err(CoreError::Config(_))));

        let result = SetupBuilder::new()
            .with_rule(LoggingRule::catch_all(LogLevel::Info, "ghost"))
            .build();
        assert!(matches!(result, Err(CoreError::Config(m)) if m.contains("ghost")));
    }

    #[test]
    fn test_failed_initialization_closes_earlier_targets() {
        let log = Recorded::default();
        let mut failing = MemoryTarget::new("bad", &log);
        failing.fail_init = true;
        let result = SetupBuilder::new()
            .write_to(MemoryTarget::new("good", &log))
            .write_to(failing)
            .build();
        assert!(result.is_err());
        assert_eq!(log.entries(), vec!["good:init", "good:close"]);
    }

    #[test]
    fn test_load_from_toml() {
        let log = Recorded::default();
        let mut registry = TargetRegistry::new();
        let shared = log.clone();
        registry.register("memory", move |name, options| {
            assert!(options.contains_key("extra"));
            Ok(Box::new(MemoryTarget::new(name, &shared)))
        });

        let config = LoggingConfiguration::load_from_toml(
            r#"
            [[targets]]
            type = "Memory"
            name = "mem"
            extra = 1

            [[rules]]
            logger = "app.*"
            min_level = "warn"
            write_to = ["mem"]
            "#,
            &registry,
        )
        .unwrap();
        assert_eq!(config.target_names(), vec!["mem"]);

        let factory = LogFactory::initialize(config).unwrap();
        factory.log(&LogEvent::new(LogLevel::Warn, "app.db", "slow"));
        factory.log(&LogEvent::new(LogLevel::Warn, "lib", "skipped"));
        factory.log(&LogEvent::new(LogLevel::Info, "app.db", "quiet"));
        assert_eq!(log.entries(), vec!["mem:init", "mem:slow"]);
    }

    #[test]
    fn test_load_from_toml_errors() {
        let registry = TargetRegistry::new();
        let missing_type = "[[targets]]\nname = \"x\"\n";
        assert!(matches!(
            LoggingConfiguration::load_from_toml(missing_type, &registry),
            Err(CoreError::Config(_))
        ));

        let unknown = "[[targets]]\ntype = \"Nope\"\nname = \"x\"\n";
        assert!(matches!(
            LoggingConfiguration::load_from_toml(unknown, &registry),
            Err(CoreError::UnknownTargetType(_))
        ));

        assert!(matches!(
            LoggingConfiguration::load_from_toml("targets = 5", &registry),
            Err(CoreError::Toml(_))
        ));
    }
}
