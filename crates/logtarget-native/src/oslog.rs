//! Apple Unified Logging target.

use std::sync::Arc;

use logtarget_core::{CoreError, CoreResult, Layout, LogEvent, LogLevel, Target};
use serde::{Deserialize, Serialize};

/// Default layout of the Apple Unified Logging target.
pub const DEFAULT_LAYOUT: &str = "${logger}|${message:withException=true:exceptionSeparator=|}";

/// Unified Logging severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsLogLevel {
    /// Debug-level messages, usually only captured while streaming.
    Debug,
    /// Informational messages.
    Info,
    /// Process-level errors.
    Error,
    /// System-level or multi-process faults.
    Fault,
}

impl OsLogLevel {
    /// Map a log level onto Unified Logging.
    ///
    /// `Trace`/`Debug` → `Debug`, `Info` → `Info`, `Warn`/`Error` →
    /// `Error`, anything else → `Fault`.
    #[must_use]
    pub fn from_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace | LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn | LogLevel::Error => Self::Error,
            LogLevel::Fatal | LogLevel::Off => Self::Fault,
        }
    }
}

/// Sink for Unified Logging messages (`os_log` on the default log object).
pub trait OsLog: Send + Sync {
    /// Emit one message.
    fn log(&self, level: OsLogLevel, message: &str);
}

/// Forwards Unified Logging messages to `tracing`, target `oslog`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOsLog;

impl OsLog for TracingOsLog {
    fn log(&self, level: OsLogLevel, message: &str) {
        match level {
            OsLogLevel::Debug => tracing::debug!(target: "oslog", "{message}"),
            OsLogLevel::Info => tracing::info!(target: "oslog", "{message}"),
            OsLogLevel::Error => tracing::error!(target: "oslog", "{message}"),
            OsLogLevel::Fault => tracing::error!(target: "oslog", fault = true, "{message}"),
        }
    }
}

fn default_layout() -> Layout {
    Layout::parse(DEFAULT_LAYOUT).unwrap_or_default()
}

/// Options of an Apple Unified Logging target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppleUnifiedTargetConfig {
    /// Message layout.
    #[serde(default = "default_layout")]
    pub layout: Layout,
    /// Accepted for configuration compatibility; not used for output.
    #[serde(default)]
    pub category: Layout,
    /// Written once when the target starts.
    #[serde(default)]
    pub header: Option<Layout>,
    /// Written once when the target closes.
    #[serde(default)]
    pub footer: Option<Layout>,
}

impl Default for AppleUnifiedTargetConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            category: Layout::default(),
            header: None,
            footer: None,
        }
    }
}

/// Writes events to Apple Unified Logging.
pub struct AppleUnifiedTarget {
    name: String,
    config: AppleUnifiedTargetConfig,
    os_log: Arc<dyn OsLog>,
}

impl std::fmt::Debug for AppleUnifiedTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppleUnifiedTarget")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppleUnifiedTarget {
    /// Type name in configuration files.
    pub const TARGET_TYPE: &'static str = "AppleUnified";

    /// Create a target.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        config: AppleUnifiedTargetConfig,
        os_log: Arc<dyn OsLog>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            os_log,
        }
    }

    /// Build from a `[[targets]]` table.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Target`] if the options are invalid.
    pub fn from_table(
        name: &str,
        table: toml::Table,
        os_log: Arc<dyn OsLog>,
    ) -> CoreResult<Self> {
        let config: AppleUnifiedTargetConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e| CoreError::target(name, e))?;
        Ok(Self::new(name, config, os_log))
    }

    fn write_line(&self, layout: &Layout, event: &LogEvent) {
        let message = layout.render(event);
        self.os_log.log(OsLogLevel::from_level(event.level), &message);
    }
}

impl Target for AppleUnifiedTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> CoreResult<()> {
        if let Some(header) = &self.config.header {
            self.write_line(header, &LogEvent::lifecycle_event("Starting"));
        }
        Ok(())
    }

    fn write(&self, event: &LogEvent) -> CoreResult<()> {
        self.write_line(&self.config.layout, event);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(footer) = &self.config.footer {
            self.write_line(footer, &LogEvent::lifecycle_event("Closing"));
        }
    }
}
